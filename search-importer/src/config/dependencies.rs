//! Dependency initialization and wiring for the search importer.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use search_repository::{
    BufferedRepository, IndexConfig, InMemoryBackend, OpenSearchBackend, RawRecord,
    RecordingBackend, RepositoryBucket, RowTransformer, SearchBackend, TransformableRepository,
};

use crate::config::settings::{BackendKind, ConnectionMode, RepositorySettings, Settings};
use crate::importer::{ImportConfig, IndexImporter};
use crate::ImportError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// Repositories accepting CSV rows, by name.
    pub bucket: Arc<RepositoryBucket<RawRecord>>,
    /// The settings the bucket was built from.
    pub settings: Settings,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`Settings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ImportError)` - If settings are invalid, or a backend can't be
    ///   reached in fail-fast mode
    pub async fn new() -> Result<Self, ImportError> {
        Self::from_settings(Settings::from_env()?).await
    }

    /// Build one repository per configured name and register it in a bucket.
    ///
    /// Every repository is a `BufferedRepository` over its backend, wrapped so
    /// it accepts CSV rows through the `RowTransformer`.
    pub async fn from_settings(settings: Settings) -> Result<Self, ImportError> {
        info!(
            repositories = settings.repositories.len(),
            connection_mode = ?settings.connection_mode,
            retry_interval_secs = settings.retry_interval.as_secs(),
            "Initializing dependencies"
        );

        let mut bucket = RepositoryBucket::new();
        for repository in &settings.repositories {
            let backend = Self::backend(repository, &settings).await?;
            let buffered =
                BufferedRepository::with_config(backend, repository.repository_config());
            let transformable = TransformableRepository::new(buffered, RowTransformer::new());
            bucket.register(repository.name.clone(), Box::new(transformable))?;

            info!(
                repository = %repository.name,
                backend = ?repository.backend,
                write_async = repository.write_async,
                chunk_size = repository.chunk_size,
                "Repository ready"
            );
        }

        Ok(Self {
            bucket: Arc::new(bucket),
            settings,
        })
    }

    /// An importer over the bucket, using the chunk size configured for `repository`.
    pub fn importer(&self, repository: &str) -> Result<IndexImporter, ImportError> {
        let settings = self
            .settings
            .repository(repository)
            .ok_or_else(|| ImportError::config(format!("Unknown repository '{}'", repository)))?;

        Ok(IndexImporter::new(
            self.bucket.clone(),
            ImportConfig {
                chunk_size: settings.chunk_size,
                ..ImportConfig::default()
            },
        ))
    }

    async fn backend(
        repository: &RepositorySettings,
        settings: &Settings,
    ) -> Result<Arc<dyn SearchBackend>, ImportError> {
        let backend: Arc<dyn SearchBackend> = match repository.backend {
            BackendKind::OpenSearch => Arc::new(
                Self::connect_to_opensearch(
                    repository,
                    settings.connection_mode,
                    settings.retry_interval,
                )
                .await?,
            ),
            BackendKind::InMemory => Arc::new(InMemoryBackend::new()),
            BackendKind::Test => Arc::new(RecordingBackend::new()),
        };
        Ok(backend)
    }

    /// Connect to OpenSearch with retry logic based on connection mode.
    async fn connect_to_opensearch(
        repository: &RepositorySettings,
        mode: ConnectionMode,
        retry_interval: Duration,
    ) -> Result<OpenSearchBackend, ImportError> {
        loop {
            match Self::try_connect_opensearch(repository, repository.index.clone()).await {
                Ok(backend) => {
                    info!(repository = %repository.name, "OpenSearch connection established");
                    return Ok(backend);
                }
                Err(e) => match mode {
                    ConnectionMode::FailFast => {
                        return Err(ImportError::config(format!(
                            "Failed to connect to OpenSearch: {}",
                            e
                        )));
                    }
                    ConnectionMode::Retry => {
                        warn!(
                            opensearch_url = %repository.endpoint,
                            error = %e,
                            retry_interval_secs = retry_interval.as_secs(),
                            "Failed to connect to OpenSearch, retrying..."
                        );
                        sleep(retry_interval).await;
                    }
                },
            }
        }
    }

    /// Attempt to connect to OpenSearch and make sure the index and alias exist.
    async fn try_connect_opensearch(
        repository: &RepositorySettings,
        index_config: IndexConfig,
    ) -> Result<OpenSearchBackend, ImportError> {
        let backend = OpenSearchBackend::new(
            &repository.endpoint,
            index_config,
            repository.credentials.clone(),
        )
        .map_err(|e| ImportError::config(format!("Failed to create OpenSearch backend: {}", e)))?;

        backend
            .ensure_index_exists()
            .await
            .map_err(|e| ImportError::config(format!("Failed to ensure index exists: {}", e)))?;

        Ok(backend)
    }
}
