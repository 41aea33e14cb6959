//! Integration tests for the importer.
//!
//! These tests wire the importer from settings the same way the binary does,
//! with local backends, and feed it CSV exports.

use std::io::Write;
use std::sync::Arc;

use async_trait::async_trait;
use search_importer::{Dependencies, ImportConfig, ImportError, IndexImporter, Settings};
use search_repository::{
    BufferedRepository, ItemQuery, RawRecord, Repository, RepositoryBucket, RepositoryError,
    RowTransformer, SearchBackend, TransformableRepository,
};
use search_repository_shared::{Item, ItemUUID};
use tokio::sync::Mutex;

/// Backend that fails every `put` after the first `succeed` ones.
struct FlakyBackend {
    succeed: usize,
    written: Mutex<Vec<Item>>,
    calls: Mutex<usize>,
}

impl FlakyBackend {
    fn new(succeed: usize) -> Self {
        Self {
            succeed,
            written: Mutex::new(Vec::new()),
            calls: Mutex::new(0),
        }
    }
}

#[async_trait]
impl SearchBackend for FlakyBackend {
    async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError> {
        let mut calls = self.calls.lock().await;
        *calls += 1;
        if *calls > self.succeed {
            return Err(RepositoryError::backend("connection reset"));
        }
        self.written.lock().await.extend_from_slice(items);
        Ok(items.len())
    }

    async fn query(&self, _query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn refresh(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

fn export_row(id: usize) -> String {
    format!(
        "{},place,\"{{\"\"image\"\":\"\"p.png\"\"}}\",\"{{\"\"rating\"\":9}}\",\"{{\"\"name\"\":\"\"Place {}\"\"}}\",,,\"{{\"\"lat\"\":41.4,\"\"lon\"\":2.17}}\"\n",
        id, id
    )
}

#[tokio::test]
async fn test_import_file_through_configured_repository() {
    let settings = Settings::from_lookup(|key| match key {
        "SEARCH_REPOSITORIES" => Some("places".to_string()),
        "SEARCH_PLACES_BACKEND" => Some("in_memory".to_string()),
        "SEARCH_PLACES_CHUNK_SIZE" => Some("3".to_string()),
        _ => None,
    })
    .unwrap();
    let deps = Dependencies::from_settings(settings).await.unwrap();

    let path = std::env::temp_dir().join(format!("search-import-{}.csv", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).unwrap();
        for id in 0..7 {
            file.write_all(export_row(id).as_bytes()).unwrap();
        }
        file.write_all(b",place\n").unwrap();
    }

    let summary = deps
        .importer("places")
        .unwrap()
        .import_file("places", &path)
        .await
        .unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(summary.read, 8);
    assert_eq!(summary.imported, 7);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.flushed_batches, 3);

    let places = deps.bucket.get("places").unwrap();
    let rows = places
        .lock()
        .await
        .query(&ItemQuery::by_uuid(ItemUUID::new("5", "place")))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].column(RawRecord::SEARCHABLE_METADATA), r#"{"name":"Place 5"}"#);
    // 9 on the ten-point scale is stored as 5 and exported as 10.
    assert_eq!(rows[0].column(RawRecord::INDEXED_METADATA), r#"{"rating":10}"#);
    assert!(!rows[0].column(RawRecord::COORDINATE).is_empty());
}

#[tokio::test]
async fn test_backend_failure_aborts_and_keeps_buffer() {
    let backend = Arc::new(FlakyBackend::new(1));
    let mut bucket = RepositoryBucket::new();
    bucket
        .register(
            "places",
            Box::new(TransformableRepository::new(
                BufferedRepository::new(backend.clone()),
                RowTransformer::new(),
            )),
        )
        .unwrap();
    let bucket = Arc::new(bucket);

    let importer = IndexImporter::new(
        bucket.clone(),
        ImportConfig {
            chunk_size: 2,
            ..ImportConfig::default()
        },
    );
    let input: String = (0..5).map(export_row).collect();

    let result = importer.import_reader("places", input.as_bytes()).await;

    assert!(matches!(
        result,
        Err(ImportError::Repository(RepositoryError::BackendError { .. }))
    ));
    // The first chunk was acknowledged, the second one is still buffered.
    assert_eq!(backend.written.lock().await.len(), 2);
    assert_eq!(bucket.get("places").unwrap().lock().await.pending(), 2);
}
