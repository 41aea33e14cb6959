//! # Search Importer
//!
//! Bulk importer for the search repository - reads CSV exports and writes
//! them through the named repositories of a [`RepositoryBucket`].
//!
//! ## Architecture
//!
//! 1. **Config**: Reads repository settings from the environment and wires
//!    each name to its backend
//! 2. **Importer**: Streams CSV rows into a repository, flushing in chunks
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`importer`]: The CSV ingestion driver
//!
//! [`RepositoryBucket`]: search_repository::RepositoryBucket

pub mod config;
pub mod importer;

pub use config::{Dependencies, Settings};
pub use importer::{ImportConfig, ImportSummary, IndexImporter};

use search_repository::RepositoryError;
use thiserror::Error;

/// Errors that can occur during importer initialization or execution.
#[derive(Error, Debug)]
pub enum ImportError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The input file could not be opened or read.
    #[error("Read error: {0}")]
    ReadError(String),

    /// Repository error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl ImportError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::ReadError(msg.into())
    }
}
