//! Configuration types for the BufferedRepository.

/// Default number of items sent to a backend in one flush.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// Configuration for a `BufferedRepository`.
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    /// When true, flushes return as soon as the backend acknowledged the batch
    /// and never ask it to refresh. When false (the default), every successful
    /// flush is followed by a backend refresh so the batch is visible to reads.
    pub write_async: bool,
}

impl RepositoryConfig {
    /// Create a config that skips the post-flush refresh.
    pub fn write_async() -> Self {
        Self { write_async: true }
    }

    /// Whether a successful flush should be followed by a refresh.
    pub fn refresh_on_flush(&self) -> bool {
        !self.write_async
    }
}
