//! Recording test double.

use std::sync::Mutex;

use async_trait::async_trait;

use search_repository_shared::Item;

use crate::errors::RepositoryError;
use crate::interfaces::SearchBackend;
use crate::types::ItemQuery;

/// A call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Put(Vec<Item>),
    Query(ItemQuery),
    Refresh,
}

/// Backend that performs no I/O and records every call in order.
///
/// `put` always succeeds and `query` always comes back empty.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Batches received by `put`, in order.
    pub fn puts(&self) -> Vec<Vec<Item>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                BackendCall::Put(items) => Some(items),
                _ => None,
            })
            .collect()
    }

    /// Number of `refresh` calls received.
    pub fn refresh_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, BackendCall::Refresh))
            .count()
    }

    fn record(&self, call: BackendCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

#[async_trait]
impl SearchBackend for RecordingBackend {
    async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError> {
        self.record(BackendCall::Put(items.to_vec()));
        Ok(items.len())
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
        self.record(BackendCall::Query(query.clone()));
        Ok(Vec::new())
    }

    async fn refresh(&self) -> Result<(), RepositoryError> {
        self.record(BackendCall::Refresh);
        Ok(())
    }
}
