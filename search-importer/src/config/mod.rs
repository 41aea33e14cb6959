//! Configuration and dependency initialization.

mod dependencies;
pub mod settings;

pub use dependencies::Dependencies;
pub use settings::{BackendKind, ConnectionMode, RepositorySettings, Settings};
