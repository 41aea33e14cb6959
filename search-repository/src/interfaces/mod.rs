//! Interface definitions for the search repository.
//!
//! This module defines the capability traits that allow swappable backends,
//! decorated repositories and pluggable record shapes.

mod repository;
mod search_backend;
mod transformer;

pub use repository::{Repository, SharedRepository};
pub use search_backend::SearchBackend;
pub use transformer::Transformer;
