//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of `SearchBackend`
//! using OpenSearch as the remote store.

mod backend;
mod index_config;

pub use backend::{BackendCredentials, OpenSearchBackend};
pub use index_config::{get_index_settings, IndexConfig};
