//! # Search Repository
//!
//! This crate provides the write path of the search service: a buffered
//! repository that batches items and writes them to a pluggable backend, a
//! decorator that accepts raw records through a transformer, and a bucket
//! routing named repositories to their backend.
//!
//! Three backends are included: OpenSearch, a process-local map and a
//! recording double for tests.

pub mod bucket;
pub mod config;
pub mod errors;
pub mod in_memory;
pub mod interfaces;
pub mod opensearch;
pub mod recording;
pub mod repository;
pub mod transformable;
pub mod transformer;
pub mod types;
pub mod utils;

pub use bucket::RepositoryBucket;
pub use config::{RepositoryConfig, DEFAULT_CHUNK_SIZE};
pub use errors::RepositoryError;
pub use in_memory::InMemoryBackend;
pub use interfaces::{Repository, SearchBackend, SharedRepository, Transformer};
pub use opensearch::{BackendCredentials, IndexConfig, OpenSearchBackend};
pub use recording::{BackendCall, RecordingBackend};
pub use repository::BufferedRepository;
pub use transformable::TransformableRepository;
pub use transformer::{DocumentTransformer, RowTransformer};
pub use types::{ItemQuery, RawRecord};
pub use utils::decode_unicode_escapes;
