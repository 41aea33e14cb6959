//! Buffered repository.
//!
//! Buffers items in memory and writes them to a `SearchBackend` in batches.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, instrument, warn};

use search_repository_shared::Item;

use crate::config::RepositoryConfig;
use crate::errors::RepositoryError;
use crate::interfaces::{Repository, SearchBackend};
use crate::types::ItemQuery;

/// Repository that batches items in memory before writing them to its backend.
///
/// The repository is responsible for:
/// - Buffering added items in insertion order, with no I/O
/// - Sending the buffer to the backend in a single `put` when flushed
/// - Keeping the buffer when the backend fails, so the same batch can be resent
/// - Asking the backend to refresh after each flush, unless writes are async
///
/// A refresh failure is reported as `RefreshError`, never `BackendError`: the
/// batch was acknowledged, so there is nothing left to resend.
pub struct BufferedRepository {
    backend: Arc<dyn SearchBackend>,
    config: RepositoryConfig,
    pending_items: Vec<Item>,
}

impl BufferedRepository {
    /// Create a new repository over the given backend with default configuration.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_config(backend, RepositoryConfig::default())
    }

    /// Create a new repository with custom configuration.
    pub fn with_config(backend: Arc<dyn SearchBackend>, config: RepositoryConfig) -> Self {
        Self {
            backend,
            config,
            pending_items: Vec::new(),
        }
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Items buffered and not yet acknowledged by the backend.
    pub fn pending_items(&self) -> &[Item] {
        &self.pending_items
    }
}

#[async_trait]
impl Repository<Item> for BufferedRepository {
    fn add_item(&mut self, item: Item) -> Result<(), RepositoryError> {
        self.pending_items.push(item);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn flush(
        &mut self,
        chunk_size: usize,
        only_if_full: bool,
    ) -> Result<usize, RepositoryError> {
        if chunk_size == 0 {
            return Err(RepositoryError::validation("chunk size must be greater than 0"));
        }
        if self.pending_items.is_empty() {
            return Ok(0);
        }
        if only_if_full && self.pending_items.len() < chunk_size {
            return Ok(0);
        }

        let count = self.pending_items.len();
        debug!(count = count, "Flushing items to backend");

        // The buffer is only cleared once the backend acknowledged the batch.
        let written = match self.backend.put(&self.pending_items).await {
            Ok(written) => written,
            Err(e) => {
                error!(error = %e, count = count, "Failed to write items, keeping buffer");
                return Err(e);
            }
        };
        self.pending_items.clear();

        if self.config.refresh_on_flush() {
            if let Err(e) = self.backend.refresh().await {
                warn!(error = %e, count = written, "Failed to refresh backend after flush");
                return Err(RepositoryError::refresh(written, &e));
            }
        }

        debug!(count = written, "Flushed items");
        Ok(written)
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
        self.backend.query(query).await
    }

    fn pending(&self) -> usize {
        self.pending_items.len()
    }
}
