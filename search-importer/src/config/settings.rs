//! Importer settings read from environment variables.

use std::env;
use std::time::Duration;

use tracing::warn;

use search_repository::{BackendCredentials, IndexConfig, RepositoryConfig, DEFAULT_CHUNK_SIZE};

use crate::ImportError;

/// Default OpenSearch URL.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9200";

/// Repository registered when `SEARCH_REPOSITORIES` is not set.
pub const DEFAULT_REPOSITORY: &str = "default";

/// Default connection retry interval in seconds.
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 15;

/// Connection mode for OpenSearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Fail immediately if connection fails.
    FailFast,
    /// Retry connection at the configured interval until successful.
    Retry,
}

impl ConnectionMode {
    /// Parse a connection mode.
    ///
    /// Valid values: "fail-fast" or "retry" (case-insensitive).
    /// Defaults to "retry" if not set or invalid.
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "retry".to_string())
            .to_lowercase()
            .as_str()
        {
            "fail-fast" | "failfast" | "fail_fast" => Self::FailFast,
            "retry" => Self::Retry,
            _ => {
                warn!("Invalid OPENSEARCH_CONNECTION_MODE, defaulting to 'retry'");
                Self::Retry
            }
        }
    }
}

/// Storage a repository writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    OpenSearch,
    InMemory,
    /// Recording double, performs no I/O.
    Test,
}

impl BackendKind {
    fn parse(repository: &str, value: &str) -> Result<Self, ImportError> {
        match value.to_lowercase().as_str() {
            "opensearch" => Ok(Self::OpenSearch),
            "in_memory" | "in-memory" | "memory" => Ok(Self::InMemory),
            "test" => Ok(Self::Test),
            other => Err(ImportError::config(format!(
                "Unknown backend '{}' for repository '{}'",
                other, repository
            ))),
        }
    }
}

/// Settings of one named repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositorySettings {
    pub name: String,
    pub backend: BackendKind,
    pub endpoint: String,
    pub index: IndexConfig,
    pub credentials: Option<BackendCredentials>,
    pub write_async: bool,
    pub chunk_size: usize,
}

impl RepositorySettings {
    pub fn repository_config(&self) -> RepositoryConfig {
        RepositoryConfig {
            write_async: self.write_async,
        }
    }
}

/// Complete importer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub repositories: Vec<RepositorySettings>,
    pub connection_mode: ConnectionMode,
    pub retry_interval: Duration,
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_REPOSITORIES`: Comma-separated repository names (default: "default")
    /// - `SEARCH_<NAME>_BACKEND`: "opensearch", "in_memory" or "test" (default: opensearch)
    /// - `SEARCH_<NAME>_ENDPOINT`: OpenSearch server URL (default: http://localhost:9200)
    /// - `SEARCH_<NAME>_INDEX_ALIAS`: Index alias name (default: the repository name)
    /// - `SEARCH_<NAME>_VERSION`: Index version number (default: 0)
    /// - `SEARCH_<NAME>_WRITE_ASYNC`: Skip the refresh after each flush (default: false)
    /// - `SEARCH_<NAME>_APP_ID` / `SEARCH_<NAME>_SECRET`: Basic-auth credentials
    /// - `SEARCH_<NAME>_CHUNK_SIZE`: Items per flush (default: 500)
    /// - `OPENSEARCH_CONNECTION_MODE`: "fail-fast" or "retry" (default: retry)
    /// - `OPENSEARCH_RETRY_INTERVAL_SECS`: Retry interval in seconds (default: 15)
    ///
    /// `<NAME>` is the repository name upper-cased, with `-` replaced by `_`.
    pub fn from_env() -> Result<Self, ImportError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ImportError> {
        let names: Vec<String> = lookup("SEARCH_REPOSITORIES")
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string())
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();

        if names.is_empty() {
            return Err(ImportError::config("SEARCH_REPOSITORIES lists no repository"));
        }

        let repositories = names
            .iter()
            .map(|name| Self::read_repository(name, &lookup))
            .collect::<Result<Vec<_>, _>>()?;

        let connection_mode = ConnectionMode::parse(lookup("OPENSEARCH_CONNECTION_MODE"));
        let retry_interval = lookup("OPENSEARCH_RETRY_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_INTERVAL_SECS);

        Ok(Self {
            repositories,
            connection_mode,
            retry_interval: Duration::from_secs(retry_interval),
        })
    }

    /// Settings of the repository registered under `name`.
    pub fn repository(&self, name: &str) -> Option<&RepositorySettings> {
        self.repositories.iter().find(|r| r.name == name)
    }

    fn read_repository(
        name: &str,
        lookup: &impl Fn(&str) -> Option<String>,
    ) -> Result<RepositorySettings, ImportError> {
        let prefix = format!("SEARCH_{}_", name.to_uppercase().replace('-', "_"));
        let var = |key: &str| {
            lookup(&format!("{}{}", prefix, key))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let backend = match var("BACKEND") {
            Some(value) => BackendKind::parse(name, &value)?,
            None => BackendKind::OpenSearch,
        };

        let version = match var("VERSION") {
            Some(value) => value.parse::<u32>().map_err(|_| {
                ImportError::config(format!("{}VERSION must be a number, got '{}'", prefix, value))
            })?,
            None => 0,
        };

        let chunk_size = match var("CHUNK_SIZE") {
            Some(value) => match value.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ImportError::config(format!(
                        "{}CHUNK_SIZE must be a positive number, got '{}'",
                        prefix, value
                    )))
                }
            },
            None => DEFAULT_CHUNK_SIZE,
        };

        let write_async = var("WRITE_ASYNC")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let credentials = var("APP_ID").map(|app_id| BackendCredentials::new(app_id, var("SECRET")));

        Ok(RepositorySettings {
            name: name.to_string(),
            backend,
            endpoint: var("ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            index: IndexConfig::new(var("INDEX_ALIAS").unwrap_or_else(|| name.to_string()), version),
            credentials,
            write_async,
            chunk_size,
        })
    }
}
