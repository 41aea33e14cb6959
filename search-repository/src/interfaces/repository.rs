//! Repository trait definition.
//!
//! A repository buffers added records and writes them to its backend in batches.
//! Both the buffered repository and the transforming decorator implement this
//! trait, so callers use one contract whatever sits underneath.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::RepositoryError;
use crate::types::ItemQuery;

/// A repository shared between tasks.
///
/// The mutex serializes `add_item` and `flush` calls coming from concurrent
/// producers so each buffer keeps a single writer.
pub type SharedRepository<R> = Arc<Mutex<Box<dyn Repository<R>>>>;

/// Buffered write contract over records of type `R`.
///
/// # Ingestion pattern
///
/// ```ignore
/// for record in records {
///     repository.add_item(record)?;
///     repository.flush(500, true).await?;
/// }
/// repository.flush(500, false).await?;
/// ```
///
/// The `only_if_full` flush after each record only reaches the backend once per
/// `chunk_size` records; the final unconditional flush drains the remainder.
#[async_trait]
pub trait Repository<R: Send>: Send + Sync {
    /// Buffer a record. Never performs I/O.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the record was buffered
    /// * `Err(RepositoryError::MalformedRecord)` - If the record couldn't be decoded
    fn add_item(&mut self, item: R) -> Result<(), RepositoryError>;

    /// Send the buffer to the backend.
    ///
    /// # Arguments
    ///
    /// * `chunk_size` - Buffer length at which a conditional flush fires (must be > 0)
    /// * `only_if_full` - When true, do nothing while fewer than `chunk_size` items are buffered
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of items written (0 when nothing was sent)
    /// * `Err(RepositoryError::BackendError)` - If the backend rejected the batch; the
    ///   buffer is left intact so the same batch can be sent again
    /// * `Err(RepositoryError::RefreshError)` - If the batch was written but the
    ///   refresh that follows failed; the buffer is cleared and nothing needs resending
    async fn flush(&mut self, chunk_size: usize, only_if_full: bool)
        -> Result<usize, RepositoryError>;

    /// Read stored records back by UUID.
    async fn query(&self, query: &ItemQuery) -> Result<Vec<R>, RepositoryError>;

    /// Number of buffered records waiting for a flush.
    fn pending(&self) -> usize;
}
