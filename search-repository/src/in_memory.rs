//! Process-local backend.
//!
//! Keeps items in a map keyed by UUID. Useful for development setups and for
//! tests that need to read back what was written.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use search_repository_shared::{Item, ItemUUID};

use crate::errors::RepositoryError;
use crate::interfaces::SearchBackend;
use crate::types::ItemQuery;

/// In-memory backend. Writes are visible immediately, so `refresh` is a no-op.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    items: RwLock<HashMap<ItemUUID, Item>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct items stored.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    /// Stored item for `uuid`, if any.
    pub async fn get(&self, uuid: &ItemUUID) -> Option<Item> {
        self.items.read().await.get(uuid).cloned()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError> {
        let mut stored = self.items.write().await;
        for item in items {
            stored.insert(item.uuid().clone(), item.clone());
        }
        Ok(items.len())
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
        let stored = self.items.read().await;
        Ok(query
            .uuids
            .iter()
            .filter_map(|uuid| stored.get(uuid).cloned())
            .collect())
    }

    async fn refresh(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn item(id: &str, title: &str) -> Item {
        let searchable = match json!({ "title": title }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Item::create(ItemUUID::new(id, "book")).with_searchable_metadata(searchable)
    }

    #[tokio::test]
    async fn test_put_is_upsert() {
        let backend = InMemoryBackend::new();

        backend.put(&[item("1", "first"), item("2", "other")]).await.unwrap();
        backend.put(&[item("1", "second")]).await.unwrap();

        assert_eq!(backend.len().await, 2);
        let stored = backend.get(&ItemUUID::new("1", "book")).await.unwrap();
        assert_eq!(stored.searchable_metadata().get("title"), Some(&json!("second")));
    }

    #[tokio::test]
    async fn test_last_entry_in_batch_wins() {
        let backend = InMemoryBackend::new();

        let written = backend.put(&[item("1", "a"), item("1", "b")]).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(backend.len().await, 1);
        let stored = backend.get(&ItemUUID::new("1", "book")).await.unwrap();
        assert_eq!(stored.searchable_metadata().get("title"), Some(&json!("b")));
    }

    #[tokio::test]
    async fn test_query_skips_unknown_uuids() {
        let backend = InMemoryBackend::new();
        backend.put(&[item("1", "a"), item("2", "b")]).await.unwrap();

        let found = backend
            .query(&ItemQuery::by_uuids([
                ItemUUID::new("2", "book"),
                ItemUUID::new("9", "book"),
                ItemUUID::new("1", "book"),
            ]))
            .await
            .unwrap();

        let ids: Vec<&str> = found.iter().map(|i| i.uuid().id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
        assert!(backend.refresh().await.is_ok());
    }
}
