//! Transformer for JSON payloads received from API calls.

use serde_json::Value;

use search_repository_shared::{Coordinate, Item, ItemUUID, MetadataMap};

use crate::errors::RepositoryError;
use crate::interfaces::Transformer;
use crate::utils::{decode_map_escapes, decode_unicode_escapes};

/// Maps API payloads shaped like a serialized [`Item`] to items and back.
///
/// ```json
/// {
///   "uuid": {"id": "1", "type": "book"},
///   "metadata": {}, "indexed_metadata": {"rating": 4},
///   "searchable_metadata": {}, "exact_matching_metadata": {}, "suggest": {},
///   "coordinate": {"lat": 40.4, "lon": -3.7}
/// }
/// ```
///
/// Ratings in payloads are already on the five-point scale. Metadata fields
/// may be omitted or `null`; the coordinate is dropped when it isn't a valid pair.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTransformer;

impl DocumentTransformer {
    pub fn new() -> Self {
        Self
    }

    fn uuid(payload: &Value) -> Result<ItemUUID, RepositoryError> {
        let uuid = payload
            .get("uuid")
            .ok_or_else(|| RepositoryError::malformed("uuid is required"))?;

        let part = |name: &str| -> Result<String, RepositoryError> {
            match uuid.get(name).and_then(Value::as_str) {
                Some(value) if !value.trim().is_empty() => {
                    Ok(decode_unicode_escapes(value).into_owned())
                }
                _ => Err(RepositoryError::malformed(format!("uuid.{} is required", name))),
            }
        };

        Ok(ItemUUID::new(part("id")?, part("type")?))
    }

    fn metadata(payload: &mut Value, name: &str) -> Result<MetadataMap, RepositoryError> {
        match payload.get_mut(name).map(Value::take) {
            None | Some(Value::Null) => Ok(MetadataMap::new()),
            Some(Value::Object(map)) => Ok(decode_map_escapes(map)),
            Some(_) => Err(RepositoryError::malformed(format!(
                "{} must be a JSON object",
                name
            ))),
        }
    }
}

impl Transformer for DocumentTransformer {
    type Raw = Value;

    fn from_raw(&self, mut raw: Value) -> Result<Item, RepositoryError> {
        if !raw.is_object() {
            return Err(RepositoryError::malformed("payload must be a JSON object"));
        }

        let uuid = Self::uuid(&raw)?;
        let coordinate = raw.get("coordinate").and_then(Coordinate::from_value);

        Ok(Item::new(
            uuid,
            Self::metadata(&mut raw, "metadata")?,
            Self::metadata(&mut raw, "indexed_metadata")?,
            Self::metadata(&mut raw, "searchable_metadata")?,
            Self::metadata(&mut raw, "exact_matching_metadata")?,
            Self::metadata(&mut raw, "suggest")?,
            coordinate,
        ))
    }

    fn to_raw(&self, item: &Item) -> Result<Value, RepositoryError> {
        serde_json::to_value(item)
            .map_err(|e| RepositoryError::malformed(format!("failed to encode item: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_raw_payload() {
        let item = DocumentTransformer::new()
            .from_raw(json!({
                "uuid": {"id": "1", "type": "book"},
                "metadata": {"cover": "c.png"},
                "indexed_metadata": {"rating": 4, "pages": 412},
                "searchable_metadata": {"title": "Dune"},
                "suggest": null,
                "coordinate": {"lat": 10.0, "lon": 20.0}
            }))
            .unwrap();

        assert_eq!(item.uuid(), &ItemUUID::new("1", "book"));
        assert_eq!(item.rating(), 4);
        assert_eq!(item.metadata().get("cover"), Some(&json!("c.png")));
        assert!(item.suggest().is_empty());
        assert!(item.exact_matching_metadata().is_empty());
        assert!(item.coordinate().is_some());
    }

    #[test]
    fn test_missing_uuid_parts_are_malformed() {
        let transformer = DocumentTransformer::new();

        for payload in [
            json!({}),
            json!({"uuid": {"id": "1"}}),
            json!({"uuid": {"type": "book"}}),
            json!({"uuid": {"id": "", "type": "book"}}),
            json!({"uuid": {"id": 1, "type": "book"}}),
            json!("not an object"),
        ] {
            let result = transformer.from_raw(payload.clone());
            assert!(
                matches!(result, Err(RepositoryError::MalformedRecord(_))),
                "payload {}",
                payload
            );
        }
    }

    #[test]
    fn test_non_object_metadata_is_malformed() {
        let result = DocumentTransformer::new().from_raw(json!({
            "uuid": {"id": "1", "type": "book"},
            "metadata": [1, 2, 3]
        }));

        assert!(matches!(result, Err(RepositoryError::MalformedRecord(_))));
    }

    #[test]
    fn test_rating_out_of_range_is_clamped() {
        let item = DocumentTransformer::new()
            .from_raw(json!({
                "uuid": {"id": "1", "type": "book"},
                "indexed_metadata": {"rating": 9}
            }))
            .unwrap();

        assert_eq!(item.rating(), 5);
    }

    #[test]
    fn test_round_trip() {
        let transformer = DocumentTransformer::new();
        let payload = json!({
            "uuid": {"id": "1", "type": "book"},
            "metadata": {"cover": "c.png"},
            "indexed_metadata": {"rating": 3},
            "searchable_metadata": {"title": "Dune"},
            "exact_matching_metadata": {"isbn": "123"},
            "suggest": {"input": ["dune"]},
            "coordinate": {"lat": 10.0, "lon": 20.0}
        });

        let item = transformer.from_raw(payload.clone()).unwrap();
        let exported = transformer.to_raw(&item).unwrap();

        assert_eq!(exported, payload);
    }
}
