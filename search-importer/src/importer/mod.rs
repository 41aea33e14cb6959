//! CSV ingestion driver.
//!
//! Streams rows from a CSV export into a named repository, flushing every
//! `chunk_size` rows and once more at the end.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::ReaderBuilder;
use tracing::{debug, info, instrument, warn};

use search_repository::{RawRecord, RepositoryBucket, RepositoryError, DEFAULT_CHUNK_SIZE};

use crate::ImportError;

/// Configuration for the importer.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Number of buffered rows that triggers a flush.
    pub chunk_size: usize,
    /// Skip rows that can't be turned into an item instead of aborting.
    pub skip_malformed: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_malformed: true,
        }
    }
}

/// Counters reported at the end of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Rows read from the input.
    pub read: usize,
    /// Items acknowledged by the backend.
    pub imported: usize,
    /// Rows skipped as malformed.
    pub skipped: usize,
    /// Flushes that reached the backend.
    pub flushed_batches: usize,
}

/// Imports CSV exports into the repositories of a bucket.
///
/// Rows have no header line and follow the positional layout of [`RawRecord`].
/// Row lengths may vary; missing trailing columns read as empty.
pub struct IndexImporter {
    bucket: Arc<RepositoryBucket<RawRecord>>,
    config: ImportConfig,
}

impl IndexImporter {
    pub fn new(bucket: Arc<RepositoryBucket<RawRecord>>, config: ImportConfig) -> Self {
        Self { bucket, config }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import the CSV file at `path` into `repository`.
    pub async fn import_file(
        &self,
        repository: &str,
        path: impl AsRef<Path>,
    ) -> Result<ImportSummary, ImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ImportError::read(format!("Failed to open {}: {}", path.display(), e))
        })?;

        info!(repository = %repository, file = %path.display(), "Importing file");
        self.import_reader(repository, file).await
    }

    /// Import CSV rows from `reader` into `repository`.
    ///
    /// The repository is looked up before anything is read. A backend failure
    /// aborts the import; rows added since the last successful flush stay
    /// buffered in the repository.
    ///
    /// Reads from `reader` are blocking and happen on the calling task while the
    /// repository lock is held, so other producers of the same repository wait
    /// for the whole import. Run it from a dedicated task when that matters.
    #[instrument(skip(self, reader))]
    pub async fn import_reader<Rd: Read>(
        &self,
        repository: &str,
        reader: Rd,
    ) -> Result<ImportSummary, ImportError> {
        let shared = self.bucket.get(repository)?;
        let mut repository = shared.lock().await;
        let chunk_size = self.config.chunk_size;

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut summary = ImportSummary::default();
        for (idx, result) in csv_reader.records().enumerate() {
            let line = idx + 1;
            let record = result
                .map_err(|e| ImportError::read(format!("Failed to read row {}: {}", line, e)))?;
            summary.read += 1;

            let raw: RawRecord = record.iter().collect();
            if let Err(e) = repository.add_item(raw) {
                if e.is_malformed_record() && self.config.skip_malformed {
                    warn!(row = line, error = %e, "Skipping malformed row");
                    summary.skipped += 1;
                    continue;
                }
                return Err(e.into());
            }

            let written = Self::record_flush(
                &mut summary,
                repository.flush(chunk_size, true).await,
            )?;
            if written > 0 {
                debug!(row = line, written = written, "Flushed chunk");
            }
        }

        Self::record_flush(&mut summary, repository.flush(chunk_size, false).await)?;

        info!(
            read = summary.read,
            imported = summary.imported,
            skipped = summary.skipped,
            batches = summary.flushed_batches,
            "Import completed"
        );
        Ok(summary)
    }

    /// Count a flush in the summary.
    ///
    /// A failed refresh doesn't abort the import: the batch is already stored.
    fn record_flush(
        summary: &mut ImportSummary,
        result: Result<usize, RepositoryError>,
    ) -> Result<usize, ImportError> {
        let written = match result {
            Ok(written) => written,
            Err(RepositoryError::RefreshError { written, message }) => {
                warn!(written = written, error = %message, "Refresh failed, continuing import");
                written
            }
            Err(e) => return Err(e.into()),
        };
        if written > 0 {
            summary.imported += written;
            summary.flushed_batches += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use search_repository::{
        BufferedRepository, InMemoryBackend, ItemQuery, RecordingBackend, RowTransformer,
        SearchBackend, TransformableRepository,
    };
    use search_repository_shared::Item;

    fn bucket(backend: Arc<dyn SearchBackend>) -> Arc<RepositoryBucket<RawRecord>> {
        let mut bucket = RepositoryBucket::new();
        bucket
            .register(
                "books",
                Box::new(TransformableRepository::new(
                    BufferedRepository::new(backend),
                    RowTransformer::new(),
                )),
            )
            .unwrap();
        Arc::new(bucket)
    }

    /// Stores every batch but never manages to refresh.
    struct NoRefreshBackend {
        inner: InMemoryBackend,
    }

    #[async_trait]
    impl SearchBackend for NoRefreshBackend {
        async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError> {
            self.inner.put(items).await
        }

        async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
            self.inner.query(query).await
        }

        async fn refresh(&self) -> Result<(), RepositoryError> {
            Err(RepositoryError::backend("refresh down"))
        }
    }

    fn csv(rows: usize) -> String {
        (0..rows)
            .map(|i| format!("{},book,,\"{{\"\"rating\"\":6}}\"\n", i))
            .collect()
    }

    #[tokio::test]
    async fn test_import_flushes_in_chunks() {
        let backend = Arc::new(RecordingBackend::new());
        let importer = IndexImporter::new(
            bucket(backend.clone()),
            ImportConfig {
                chunk_size: 4,
                ..ImportConfig::default()
            },
        );

        let summary = importer
            .import_reader("books", csv(10).as_bytes())
            .await
            .unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                read: 10,
                imported: 10,
                skipped: 0,
                flushed_batches: 3,
            }
        );
        let sizes: Vec<usize> = backend.puts().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(backend.puts()[0][0].rating(), 3);
    }

    #[tokio::test]
    async fn test_refresh_failure_does_not_abort_import() {
        let backend = Arc::new(NoRefreshBackend {
            inner: InMemoryBackend::new(),
        });
        let importer = IndexImporter::new(
            bucket(backend.clone()),
            ImportConfig {
                chunk_size: 4,
                ..ImportConfig::default()
            },
        );

        let summary = importer
            .import_reader("books", csv(10).as_bytes())
            .await
            .unwrap();

        assert_eq!(summary.imported, 10);
        assert_eq!(summary.flushed_batches, 3);
        assert_eq!(backend.inner.len().await, 10);
    }

    #[tokio::test]
    async fn test_malformed_rows_are_skipped() {
        let backend = Arc::new(InMemoryBackend::new());
        let importer = IndexImporter::new(bucket(backend.clone()), ImportConfig::default());
        let input = "1,book\n,book\n2,book,{broken\n3,book\n";

        let summary = importer.import_reader("books", input.as_bytes()).await.unwrap();

        assert_eq!(summary.read, 4);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.imported, 2);
        assert_eq!(backend.len().await, 2);
    }

    #[tokio::test]
    async fn test_malformed_row_aborts_when_not_skipping() {
        let backend = Arc::new(InMemoryBackend::new());
        let importer = IndexImporter::new(
            bucket(backend.clone()),
            ImportConfig {
                skip_malformed: false,
                ..ImportConfig::default()
            },
        );

        let result = importer.import_reader("books", "1,book\n,book\n".as_bytes()).await;

        assert!(matches!(
            result,
            Err(ImportError::Repository(RepositoryError::MalformedRecord(_)))
        ));
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_repository() {
        let importer = IndexImporter::new(
            bucket(Arc::new(RecordingBackend::new())),
            ImportConfig::default(),
        );

        let result = importer.import_reader("movies", "1,book\n".as_bytes()).await;

        assert!(matches!(
            result,
            Err(ImportError::Repository(RepositoryError::RepositoryNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let importer = IndexImporter::new(
            bucket(Arc::new(RecordingBackend::new())),
            ImportConfig::default(),
        );

        let result = importer
            .import_file("books", "/definitely/not/here.csv")
            .await;

        assert!(matches!(result, Err(ImportError::ReadError(_))));
    }
}
