//! Utility functions for the search repository.

use std::borrow::Cow;

use serde_json::{Map, Value};

/// Decode literal `\uXXXX` escape sequences embedded in text.
///
/// Raw exports often carry escapes as plain text rather than as part of a JSON
/// string, so they survive JSON parsing untouched. Each well formed escape is
/// replaced by its code point; a high/low surrogate pair written as two escapes
/// becomes one character. Unpaired surrogates and malformed sequences are left
/// as they are. Text without escapes is returned borrowed.
///
/// # Example
///
/// ```
/// use search_repository::decode_unicode_escapes;
///
/// assert_eq!(decode_unicode_escapes(r"caf\u00e9"), "café");
/// assert_eq!(decode_unicode_escapes("plain"), "plain");
/// ```
pub fn decode_unicode_escapes(text: &str) -> Cow<'_, str> {
    if !text.contains("\\u") {
        return Cow::Borrowed(text);
    }

    let mut decoded = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(position) = rest.find("\\u") {
        decoded.push_str(&rest[..position]);
        let escape = &rest[position..];

        match parse_escape(escape) {
            Some((character, consumed)) => {
                decoded.push(character);
                rest = &escape[consumed..];
            }
            None => {
                decoded.push_str("\\u");
                rest = &escape[2..];
            }
        }
    }

    decoded.push_str(rest);
    Cow::Owned(decoded)
}

/// Apply [`decode_unicode_escapes`] to every string and object key inside a JSON value.
pub fn decode_value_escapes(value: Value) -> Value {
    match value {
        Value::String(text) => match decode_unicode_escapes(&text) {
            Cow::Borrowed(_) => Value::String(text),
            Cow::Owned(decoded) => Value::String(decoded),
        },
        Value::Array(values) => Value::Array(values.into_iter().map(decode_value_escapes).collect()),
        Value::Object(map) => Value::Object(decode_map_escapes(map)),
        other => other,
    }
}

/// Decode escapes in every key and value of a JSON object.
pub fn decode_map_escapes(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            (
                decode_unicode_escapes(&key).into_owned(),
                decode_value_escapes(value),
            )
        })
        .collect()
}

/// Parse the escape at the start of `text`, returning the character and the bytes consumed.
fn parse_escape(text: &str) -> Option<(char, usize)> {
    let unit = code_unit(text)?;

    match unit {
        0xD800..=0xDBFF => {
            let low = code_unit(text.get(6..)?)?;
            if !(0xDC00..=0xDFFF).contains(&low) {
                return None;
            }
            let code = 0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
            Some((char::from_u32(code)?, 12))
        }
        0xDC00..=0xDFFF => None,
        _ => Some((char::from_u32(u32::from(unit))?, 6)),
    }
}

fn code_unit(text: &str) -> Option<u16> {
    let digits = text.strip_prefix("\\u")?.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_basic_escape() {
        assert_eq!(decode_unicode_escapes(r"caf\u00e9"), "café");
        assert_eq!(decode_unicode_escapes(r"\u00C9cole"), "École");
    }

    #[test]
    fn test_text_without_escapes_is_borrowed() {
        let decoded = decode_unicode_escapes("no escapes here");
        assert!(matches!(decoded, Cow::Borrowed("no escapes here")));
    }

    #[test]
    fn test_surrogate_pair() {
        assert_eq!(decode_unicode_escapes(r"smile \ud83d\ude00"), "smile 😀");
    }

    #[test]
    fn test_malformed_sequences_are_kept() {
        assert_eq!(decode_unicode_escapes(r"bad \u00zz"), r"bad \u00zz");
        assert_eq!(decode_unicode_escapes(r"short \u00"), r"short \u00");
        assert_eq!(decode_unicode_escapes(r"lone \ud83d!"), r"lone \ud83d!");
        assert_eq!(decode_unicode_escapes(r"low \ude00"), r"low \ude00");
    }

    #[test]
    fn test_multiple_escapes_and_multibyte_neighbours() {
        assert_eq!(
            decode_unicode_escapes(r"ñ\u00e1\u00E9 and \u00f3ñ"),
            "ñáé and óñ"
        );
    }

    #[test]
    fn test_decode_value_escapes_walks_nested_values() {
        let value = json!({
            r"t\u00edtulo": r"caf\u00e9",
            "tags": [r"\u00e0 la carte", 3],
            "nested": {"name": "plain"}
        });

        let decoded = decode_value_escapes(value);

        assert_eq!(
            decoded,
            json!({
                "título": "café",
                "tags": ["à la carte", 3],
                "nested": {"name": "plain"}
            })
        );
    }
}
