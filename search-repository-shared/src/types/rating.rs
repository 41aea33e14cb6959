//! Rating rules for the `rating` field of indexed metadata.
//!
//! Every item carries an integer rating between [`MIN_RATING`] and [`MAX_RATING`]
//! in its indexed metadata. Sources that rate on a ten-point scale are folded
//! onto that range with `ceil(rating / 2)` when the item is built.

use serde_json::Value;

/// Key of the rating inside indexed metadata.
pub const RATING_FIELD: &str = "rating";

pub const MIN_RATING: u8 = 0;
pub const MAX_RATING: u8 = 5;

/// Coerce a rating that is already on the five-point scale.
///
/// Missing or non-numeric values become `0`; fractional values are rounded up
/// and the result is clamped to `[0, 5]`.
pub fn coerce(value: Option<&Value>) -> u8 {
    value.and_then(as_number).map(clamp).unwrap_or(MIN_RATING)
}

/// Normalize a rating given on a ten-point scale.
///
/// `10 → 5`, `9 → 5`, `6 → 3`, `1 → 1`, `0` or missing `→ 0`.
pub fn from_ten_point_scale(value: Option<&Value>) -> u8 {
    value
        .and_then(as_number)
        .map(|rating| clamp(rating / 2.0))
        .unwrap_or(MIN_RATING)
}

/// Express a five-point rating back on the ten-point scale.
pub fn to_ten_point_scale(rating: u8) -> u8 {
    rating.saturating_mul(2)
}

fn clamp(rating: f64) -> u8 {
    rating.ceil().clamp(f64::from(MIN_RATING), f64::from(MAX_RATING)) as u8
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ten_point_scale() {
        let cases = [(10, 5), (9, 5), (6, 3), (1, 1), (0, 0)];
        for (input, expected) in cases {
            assert_eq!(
                from_ten_point_scale(Some(&json!(input))),
                expected,
                "rating {}",
                input
            );
        }
        assert_eq!(from_ten_point_scale(None), 0);
    }

    #[test]
    fn test_ten_point_scale_out_of_range() {
        assert_eq!(from_ten_point_scale(Some(&json!(25))), 5);
        assert_eq!(from_ten_point_scale(Some(&json!(-4))), 0);
        assert_eq!(from_ten_point_scale(Some(&json!("7"))), 4);
        assert_eq!(from_ten_point_scale(Some(&json!("great"))), 0);
        assert_eq!(from_ten_point_scale(Some(&Value::Null)), 0);
    }

    #[test]
    fn test_coerce() {
        assert_eq!(coerce(Some(&json!(3))), 3);
        assert_eq!(coerce(Some(&json!(3.2))), 4);
        assert_eq!(coerce(Some(&json!(8))), 5);
        assert_eq!(coerce(Some(&json!(-1))), 0);
        assert_eq!(coerce(None), 0);
    }

    #[test]
    fn test_to_ten_point_scale_round_trips() {
        for rating in MIN_RATING..=MAX_RATING {
            let ten = to_ten_point_scale(rating);
            assert_eq!(from_ten_point_scale(Some(&json!(ten))), rating);
        }
    }
}
