//! Item types for the search repository.
//!
//! This module defines the canonical document that every backend stores.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::coordinate::Coordinate;
use crate::types::item_uuid::ItemUUID;
use crate::types::rating::{self, RATING_FIELD};

/// A JSON object holding one category of item metadata.
pub type MetadataMap = Map<String, Value>;

/// Canonical indexable document.
///
/// Metadata is split by how the backend should treat it:
///
/// - `metadata`: stored with the document, never indexed or searched
/// - `indexed_metadata`: indexed for structured filtering and sorting
/// - `searchable_metadata`: full-text indexed
/// - `exact_matching_metadata`: indexed for exact-match filters only
/// - `suggest`: tokens feeding autocomplete
///
/// An `Item` never changes once built. `indexed_metadata` always holds an
/// integer `rating` in `[0, 5]`; the constructors (and deserialization) enforce
/// it, so the invariant holds whichever path produced the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemFields")]
pub struct Item {
    uuid: ItemUUID,
    metadata: MetadataMap,
    indexed_metadata: MetadataMap,
    searchable_metadata: MetadataMap,
    exact_matching_metadata: MetadataMap,
    suggest: MetadataMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    coordinate: Option<Coordinate>,
}

#[derive(Deserialize)]
struct ItemFields {
    uuid: ItemUUID,
    #[serde(default)]
    metadata: MetadataMap,
    #[serde(default)]
    indexed_metadata: MetadataMap,
    #[serde(default)]
    searchable_metadata: MetadataMap,
    #[serde(default)]
    exact_matching_metadata: MetadataMap,
    #[serde(default)]
    suggest: MetadataMap,
    #[serde(default)]
    coordinate: Option<Coordinate>,
}

impl From<ItemFields> for Item {
    fn from(fields: ItemFields) -> Self {
        Item::new(
            fields.uuid,
            fields.metadata,
            fields.indexed_metadata,
            fields.searchable_metadata,
            fields.exact_matching_metadata,
            fields.suggest,
            fields.coordinate,
        )
    }
}

impl Item {
    /// Create an item from all of its parts.
    ///
    /// The `rating` in `indexed_metadata` is taken to be on the five-point scale
    /// and coerced into an integer in `[0, 5]`; it is inserted as `0` when absent.
    ///
    /// # Example
    ///
    /// ```
    /// use search_repository_shared::{Item, ItemUUID, MetadataMap};
    ///
    /// let item = Item::new(
    ///     ItemUUID::new("1", "book"),
    ///     MetadataMap::new(),
    ///     MetadataMap::new(),
    ///     MetadataMap::new(),
    ///     MetadataMap::new(),
    ///     MetadataMap::new(),
    ///     None,
    /// );
    /// assert_eq!(item.rating(), 0);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        uuid: ItemUUID,
        metadata: MetadataMap,
        indexed_metadata: MetadataMap,
        searchable_metadata: MetadataMap,
        exact_matching_metadata: MetadataMap,
        suggest: MetadataMap,
        coordinate: Option<Coordinate>,
    ) -> Self {
        Self {
            uuid,
            metadata,
            indexed_metadata: with_rating(indexed_metadata),
            searchable_metadata,
            exact_matching_metadata,
            suggest,
            coordinate,
        }
    }

    /// Create an item with empty metadata and a zero rating.
    pub fn create(uuid: ItemUUID) -> Self {
        Self::new(
            uuid,
            MetadataMap::new(),
            MetadataMap::new(),
            MetadataMap::new(),
            MetadataMap::new(),
            MetadataMap::new(),
            None,
        )
    }

    /// Return a copy with the given stored-only metadata.
    pub fn with_metadata(mut self, metadata: MetadataMap) -> Self {
        self.metadata = metadata;
        self
    }

    /// Return a copy with the given indexed metadata, re-applying the rating rules.
    pub fn with_indexed_metadata(mut self, indexed_metadata: MetadataMap) -> Self {
        self.indexed_metadata = with_rating(indexed_metadata);
        self
    }

    pub fn with_searchable_metadata(mut self, searchable_metadata: MetadataMap) -> Self {
        self.searchable_metadata = searchable_metadata;
        self
    }

    pub fn with_exact_matching_metadata(mut self, exact_matching_metadata: MetadataMap) -> Self {
        self.exact_matching_metadata = exact_matching_metadata;
        self
    }

    pub fn with_suggest(mut self, suggest: MetadataMap) -> Self {
        self.suggest = suggest;
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn uuid(&self) -> &ItemUUID {
        &self.uuid
    }

    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn indexed_metadata(&self) -> &MetadataMap {
        &self.indexed_metadata
    }

    pub fn searchable_metadata(&self) -> &MetadataMap {
        &self.searchable_metadata
    }

    pub fn exact_matching_metadata(&self) -> &MetadataMap {
        &self.exact_matching_metadata
    }

    pub fn suggest(&self) -> &MetadataMap {
        &self.suggest
    }

    pub fn coordinate(&self) -> Option<&Coordinate> {
        self.coordinate.as_ref()
    }

    /// The normalized rating stored in indexed metadata.
    pub fn rating(&self) -> u8 {
        rating::coerce(self.indexed_metadata.get(RATING_FIELD))
    }

    /// Document id used by backends, see [`ItemUUID::composed_uuid`].
    pub fn document_id(&self) -> String {
        self.uuid.composed_uuid()
    }
}

fn with_rating(mut indexed_metadata: MetadataMap) -> MetadataMap {
    let rating = rating::coerce(indexed_metadata.get(RATING_FIELD));
    indexed_metadata.insert(RATING_FIELD.to_string(), Value::from(rating));
    indexed_metadata
}
