//! Transformer for rows coming from bulk file imports.

use serde_json::{json, Value};
use tracing::debug;

use search_repository_shared::rating::{self, RATING_FIELD};
use search_repository_shared::{Coordinate, Item, ItemUUID, MetadataMap};

use crate::errors::RepositoryError;
use crate::interfaces::Transformer;
use crate::types::RawRecord;
use crate::utils::{decode_map_escapes, decode_unicode_escapes};

/// Maps positional CSV rows to items and back.
///
/// On the way in, the id and type are required, every JSON column is parsed
/// and has its literal `\uXXXX` escapes decoded, the ten-point `rating` is
/// folded onto the five-point scale and the coordinate column is kept only
/// when it holds two numeric values. On the way out, the rating is written
/// back on the ten-point scale so that re-importing an exported row yields the
/// same item.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowTransformer;

impl RowTransformer {
    pub fn new() -> Self {
        Self
    }

    fn required_column(
        raw: &RawRecord,
        index: usize,
        name: &str,
    ) -> Result<String, RepositoryError> {
        let value = raw.column(index);
        if value.trim().is_empty() {
            return Err(RepositoryError::malformed(format!("{} is required", name)));
        }
        Ok(decode_unicode_escapes(value).into_owned())
    }

    fn json_column(
        raw: &RawRecord,
        index: usize,
        name: &str,
    ) -> Result<MetadataMap, RepositoryError> {
        let text = raw.column(index);
        if text.trim().is_empty() {
            return Ok(MetadataMap::new());
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(decode_map_escapes(map)),
            Ok(Value::Null) => Ok(MetadataMap::new()),
            Ok(other) => Err(RepositoryError::malformed(format!(
                "{} must be a JSON object, got {}",
                name,
                json_kind(&other)
            ))),
            Err(e) => Err(RepositoryError::malformed(format!(
                "{} is not valid JSON: {}",
                name, e
            ))),
        }
    }

    fn coordinate_column(raw: &RawRecord) -> Option<Coordinate> {
        let text = raw.column(RawRecord::COORDINATE).trim();
        if text.is_empty() {
            return None;
        }

        let value =
            serde_json::from_str::<Value>(text).unwrap_or_else(|_| Value::String(text.to_string()));
        let coordinate = Coordinate::from_value(&value);
        if coordinate.is_none() {
            debug!(coordinate = %text, "Ignoring malformed coordinate");
        }
        coordinate
    }

    fn json_text(map: &MetadataMap, name: &str) -> Result<String, RepositoryError> {
        serde_json::to_string(map)
            .map_err(|e| RepositoryError::malformed(format!("failed to encode {}: {}", name, e)))
    }
}

impl Transformer for RowTransformer {
    type Raw = RawRecord;

    fn from_raw(&self, raw: RawRecord) -> Result<Item, RepositoryError> {
        let id = Self::required_column(&raw, RawRecord::ID, "id")?;
        let item_type = Self::required_column(&raw, RawRecord::TYPE, "type")?;

        let metadata = Self::json_column(&raw, RawRecord::METADATA, "metadata")?;
        let mut indexed_metadata =
            Self::json_column(&raw, RawRecord::INDEXED_METADATA, "indexed_metadata")?;
        let searchable_metadata =
            Self::json_column(&raw, RawRecord::SEARCHABLE_METADATA, "searchable_metadata")?;
        let exact_matching_metadata = Self::json_column(
            &raw,
            RawRecord::EXACT_MATCHING_METADATA,
            "exact_matching_metadata",
        )?;
        let suggest = Self::json_column(&raw, RawRecord::SUGGEST, "suggest")?;

        let normalized = rating::from_ten_point_scale(indexed_metadata.get(RATING_FIELD));
        indexed_metadata.insert(RATING_FIELD.to_string(), Value::from(normalized));

        Ok(Item::new(
            ItemUUID::new(id, item_type),
            metadata,
            indexed_metadata,
            searchable_metadata,
            exact_matching_metadata,
            suggest,
            Self::coordinate_column(&raw),
        ))
    }

    fn to_raw(&self, item: &Item) -> Result<RawRecord, RepositoryError> {
        let mut indexed_metadata = item.indexed_metadata().clone();
        indexed_metadata.insert(
            RATING_FIELD.to_string(),
            Value::from(rating::to_ten_point_scale(item.rating())),
        );

        let coordinate = item
            .coordinate()
            .map(|c| json!({"lat": c.lat(), "lon": c.lon()}).to_string())
            .unwrap_or_default();

        Ok(RawRecord::new(vec![
            item.uuid().id.clone(),
            item.uuid().item_type.clone(),
            Self::json_text(item.metadata(), "metadata")?,
            Self::json_text(&indexed_metadata, "indexed_metadata")?,
            Self::json_text(item.searchable_metadata(), "searchable_metadata")?,
            Self::json_text(item.exact_matching_metadata(), "exact_matching_metadata")?,
            Self::json_text(item.suggest(), "suggest")?,
            coordinate,
        ]))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
