//! Repository error types.
//!
//! This module defines the error type shared by every layer of the write path,
//! from raw record decoding down to backend I/O.

use thiserror::Error;

/// Unified errors from repository operations.
///
/// The variants are kept distinguishable so that an ingestion driver can decide
/// per error kind whether to skip a record or abort: a `MalformedRecord` only
/// concerns the record that produced it, while a `BackendError` means a whole
/// batch was not acknowledged and is still buffered.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A raw record could not be turned into an item (missing id/type, bad JSON column).
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// I/O or protocol failure while talking to a backend.
    #[error("Backend error: {message}")]
    BackendError {
        message: String,
        /// Diagnostic payload returned by the backend, if any.
        detail: Option<String>,
    },

    /// The backend acknowledged `written` items but refreshing the index failed.
    ///
    /// The items are stored and no longer buffered; they may just not be
    /// visible to queries yet.
    #[error("Refresh failed after writing {written} items: {message}")]
    RefreshError { written: usize, message: String },

    /// No repository is registered under the requested name.
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// A repository is already registered under this name.
    #[error("Duplicate repository: {0}")]
    DuplicateRepository(String),

    /// Invalid argument passed to a repository operation.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl RepositoryError {
    /// Create a malformed record error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRecord(msg.into())
    }

    /// Create a backend error without diagnostic detail.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::BackendError {
            message: msg.into(),
            detail: None,
        }
    }

    /// Create a backend error carrying the backend's diagnostic payload.
    pub fn backend_with_detail(msg: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::BackendError {
            message: msg.into(),
            detail: Some(detail.into()),
        }
    }

    /// Create a refresh error for a batch of `written` items already stored.
    pub fn refresh(written: usize, source: &RepositoryError) -> Self {
        Self::RefreshError {
            written,
            message: source.to_string(),
        }
    }

    /// Create a repository not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::RepositoryNotFound(name.into())
    }

    /// Create a duplicate repository error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateRepository(name.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Whether this error concerns a single record rather than the repository.
    pub fn is_malformed_record(&self) -> bool {
        matches!(self, Self::MalformedRecord(_))
    }

    /// Diagnostic payload attached to a backend error.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::BackendError { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_detail() {
        let err = RepositoryError::backend_with_detail("bulk failed", "{\"errors\":true}");
        assert_eq!(err.to_string(), "Backend error: bulk failed");
        assert_eq!(err.detail(), Some("{\"errors\":true}"));

        assert_eq!(RepositoryError::backend("down").detail(), None);
    }

    #[test]
    fn test_refresh_error_keeps_written_count() {
        let err = RepositoryError::refresh(3, &RepositoryError::backend("down"));
        assert_eq!(
            err.to_string(),
            "Refresh failed after writing 3 items: Backend error: down"
        );
        assert!(matches!(err, RepositoryError::RefreshError { written: 3, .. }));
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_is_malformed_record() {
        assert!(RepositoryError::malformed("missing id").is_malformed_record());
        assert!(!RepositoryError::backend("down").is_malformed_record());
        assert!(!RepositoryError::not_found("x").is_malformed_record());
    }
}
