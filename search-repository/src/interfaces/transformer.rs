//! Transformer trait definition.

use search_repository_shared::Item;

use crate::errors::RepositoryError;

/// Pure mapping between an external record shape and an [`Item`].
///
/// `from_raw` validates and normalizes; `to_raw` gives the external shape back
/// (for re-export or for returning reads to the caller). Neither side performs
/// I/O or keeps state between calls.
pub trait Transformer: Send + Sync {
    /// The external shape (CSV row, JSON payload, API DTO...).
    type Raw: Send;

    /// Build an item from a raw record.
    ///
    /// Returns `RepositoryError::MalformedRecord` when the record can't identify
    /// an item; no partially built item is ever produced.
    fn from_raw(&self, raw: Self::Raw) -> Result<Item, RepositoryError>;

    /// Render an item in the external shape.
    fn to_raw(&self, item: &Item) -> Result<Self::Raw, RepositoryError>;
}
