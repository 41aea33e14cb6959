//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for item documents.

use serde_json::{json, Value};

/// Configuration for the search index backing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// The alias name for the search index (used for all operations).
    pub alias: String,
    /// The version number for the index (e.g., 0 for "items_v0").
    pub version: u32,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name
    /// * `version` - The version number
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
        }
    }

    /// The concrete index the alias points to, e.g. `items_v3`.
    pub fn versioned_index_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

/// Get the index settings, mappings and alias for an item index.
///
/// Each metadata category of an item maps to a different field treatment:
/// - **metadata**: stored in `_source` only, never indexed
/// - **indexed_metadata**: dynamic object for filtering and sorting
/// - **searchable_metadata**: dynamic strings indexed as full text
/// - **exact_matching_metadata**: dynamic strings indexed as keywords
/// - **suggest**: `search_as_you_type` fields for autocomplete
/// - **coordinate**: `geo_point`
pub fn get_index_settings(config: &IndexConfig) -> Value {
    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "aliases": {
            config.alias.as_str(): {}
        },
        "mappings": {
            "dynamic_templates": [
                {
                    "searchable_strings": {
                        "path_match": "searchable_metadata.*",
                        "match_mapping_type": "string",
                        "mapping": { "type": "text" }
                    }
                },
                {
                    "exact_matching_strings": {
                        "path_match": "exact_matching_metadata.*",
                        "match_mapping_type": "string",
                        "mapping": { "type": "keyword" }
                    }
                },
                {
                    "suggest_strings": {
                        "path_match": "suggest.*",
                        "match_mapping_type": "string",
                        "mapping": { "type": "search_as_you_type" }
                    }
                }
            ],
            "properties": {
                "uuid": {
                    "properties": {
                        "id": { "type": "keyword" },
                        "type": { "type": "keyword" }
                    }
                },
                "metadata": {
                    "type": "object",
                    "enabled": false
                },
                "indexed_metadata": {
                    "type": "object",
                    "properties": {
                        "rating": { "type": "integer" }
                    }
                },
                "searchable_metadata": { "type": "object" },
                "exact_matching_metadata": { "type": "object" },
                "suggest": { "type": "object" },
                "coordinate": { "type": "geo_point" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_settings_structure() {
        let settings = get_index_settings(&IndexConfig::new("books", 2));

        assert!(settings["settings"]["number_of_shards"].is_number());
        assert!(settings["aliases"]["books"].is_object());

        let properties = &settings["mappings"]["properties"];
        assert_eq!(properties["metadata"]["enabled"], false);
        assert_eq!(properties["coordinate"]["type"], "geo_point");
        assert_eq!(properties["uuid"]["properties"]["type"]["type"], "keyword");
        assert_eq!(
            properties["indexed_metadata"]["properties"]["rating"]["type"],
            "integer"
        );
        assert_eq!(
            settings["mappings"]["dynamic_templates"]
                .as_array()
                .map(Vec::len),
            Some(3)
        );
    }

    #[test]
    fn test_versioned_index_name() {
        assert_eq!(IndexConfig::new("items", 0).versioned_index_name(), "items_v0");
        assert_eq!(IndexConfig::new("items", 1).versioned_index_name(), "items_v1");
        assert_eq!(IndexConfig::new("books", 42).versioned_index_name(), "books_v42");
    }
}
