//! Repository decorator that accepts raw records.

use async_trait::async_trait;
use tracing::debug;

use search_repository_shared::Item;

use crate::errors::RepositoryError;
use crate::interfaces::{Repository, Transformer};
use crate::types::ItemQuery;

/// Wraps an item repository so callers can add records in an external shape.
///
/// Every raw record goes through [`Transformer::from_raw`] before reaching the
/// inner repository; a record that fails to transform is rejected without
/// touching the inner buffer. Flushes are delegated untouched and query
/// results are mapped back through [`Transformer::to_raw`].
pub struct TransformableRepository<Inner, T> {
    inner: Inner,
    transformer: T,
}

impl<Inner, T> TransformableRepository<Inner, T>
where
    Inner: Repository<Item>,
    T: Transformer,
{
    pub fn new(inner: Inner, transformer: T) -> Self {
        Self { inner, transformer }
    }

    pub fn inner(&self) -> &Inner {
        &self.inner
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }
}

#[async_trait]
impl<Inner, T> Repository<T::Raw> for TransformableRepository<Inner, T>
where
    Inner: Repository<Item>,
    T: Transformer,
{
    fn add_item(&mut self, raw: T::Raw) -> Result<(), RepositoryError> {
        let item = self.transformer.from_raw(raw).map_err(|e| {
            debug!(error = %e, "Rejected raw record");
            e
        })?;
        self.inner.add_item(item)
    }

    async fn flush(
        &mut self,
        chunk_size: usize,
        only_if_full: bool,
    ) -> Result<usize, RepositoryError> {
        self.inner.flush(chunk_size, only_if_full).await
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<T::Raw>, RepositoryError> {
        self.inner
            .query(query)
            .await?
            .iter()
            .map(|item| self.transformer.to_raw(item))
            .collect()
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }
}
