//! Search backend trait definition.
//!
//! This module defines the abstract interface every storage backend implements,
//! allowing the remote, in-memory and recording backends to be swapped freely.

use async_trait::async_trait;
use search_repository_shared::Item;

use crate::errors::RepositoryError;
use crate::types::ItemQuery;

/// Abstracts the storage behind a repository (OpenSearch, in-memory map, test double).
///
/// Implementations are chosen when the repository is built and injected into it;
/// nothing in the write path branches on the concrete backend.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync`. Several repositories may share one
/// backend, so `put` can be called concurrently.
///
/// # Delivery
///
/// A batch whose `put` failed is sent again by the caller, so `put` must treat
/// every item as an upsert keyed by its `ItemUUID`: writing the same batch twice
/// leaves the backend in the same state as writing it once.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Write a batch of items, replacing any stored item with the same UUID.
    ///
    /// Later entries win when the batch holds the same UUID more than once.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of items acknowledged by the backend
    /// * `Err(RepositoryError::BackendError)` - If the batch was not fully acknowledged
    async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError>;

    /// Fetch stored items by UUID.
    ///
    /// Items are returned in query order; UUIDs the backend doesn't know are skipped.
    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError>;

    /// Make recent writes visible to subsequent queries.
    ///
    /// Backends whose writes are immediately visible implement this as a no-op.
    async fn refresh(&self) -> Result<(), RepositoryError>;
}
