//! Error types for the search repository.
//!
//! This module provides a unified error type for repository, transformer,
//! backend and registry operations.

mod repository_error;

pub use repository_error::RepositoryError;
