//! OpenSearch backend implementation.
//!
//! This module provides the concrete implementation of `SearchBackend`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesPutAliasParts, IndicesRefreshParts},
    BulkParts, MgetParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};
use url::Url;

use search_repository_shared::Item;

use crate::errors::RepositoryError;
use crate::interfaces::SearchBackend;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};
use crate::types::ItemQuery;

/// Basic-auth credentials for a managed search service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCredentials {
    pub app_id: String,
    pub secret: Option<String>,
}

impl BackendCredentials {
    pub fn new(app_id: impl Into<String>, secret: Option<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret,
        }
    }
}

/// OpenSearch backend.
///
/// Every item is written as a whole document under its composed UUID, so
/// writes are idempotent upserts. A batch is sent as a single `_bulk`
/// request; the call fails if any document in it was rejected.
///
/// # Example
///
/// ```ignore
/// use search_repository::opensearch::{IndexConfig, OpenSearchBackend};
///
/// let backend = OpenSearchBackend::new("http://localhost:9200", IndexConfig::new("books", 0), None)?;
/// backend.ensure_index_exists().await?;
/// backend.put(&items).await?;
/// ```
pub struct OpenSearchBackend {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchBackend {
    /// Create a new OpenSearch backend connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias and version
    /// * `credentials` - Optional basic-auth credentials
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchBackend)` - A new backend instance
    /// * `Err(RepositoryError)` - If the URL is invalid or transport setup fails
    pub fn new(
        url: &str,
        index_config: IndexConfig,
        credentials: Option<BackendCredentials>,
    ) -> Result<Self, RepositoryError> {
        let parsed_url = Url::parse(url)
            .map_err(|e| RepositoryError::backend(format!("Invalid URL '{}': {}", url, e)))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(credentials) = credentials {
            builder = builder.auth(Credentials::Basic(
                credentials.app_id,
                credentials.secret.unwrap_or_default(),
            ));
        }
        let transport = builder
            .build()
            .map_err(|e| RepositoryError::backend(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch backend"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    pub fn index_config(&self) -> &IndexConfig {
        &self.index_config
    }

    /// Make sure the alias resolves to an index, creating the versioned index
    /// with its mappings (and the alias) when missing.
    ///
    /// Intended to run once at startup, before any write.
    pub async fn ensure_index_exists(&self) -> Result<(), RepositoryError> {
        let alias = self.index_config.alias.as_str();
        if self.index_exists(alias).await? {
            debug!(alias = %alias, "Index alias already exists");
            return Ok(());
        }

        let index_name = self.index_config.versioned_index_name();
        if self.index_exists(&index_name).await? {
            warn!(index = %index_name, alias = %alias, "Index exists without alias, adding it");
            let response = self
                .client
                .indices()
                .put_alias(IndicesPutAliasParts::IndexName(&[index_name.as_str()], alias))
                .send()
                .await
                .map_err(|e| RepositoryError::backend(e.to_string()))?;
            return Self::expect_success(response, "Put alias").await;
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(get_index_settings(&self.index_config))
            .send()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;
        Self::expect_success(response, "Create index").await?;

        info!(index = %index_name, alias = %alias, "Created search index");
        Ok(())
    }

    async fn index_exists(&self, name: &str) -> Result<bool, RepositoryError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[name]))
            .send()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;

        let status = response.status_code();
        match status.as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(RepositoryError::backend(format!(
                "Index exists check failed with status {}",
                status
            ))),
        }
    }

    async fn expect_success(response: Response, operation: &str) -> Result<(), RepositoryError> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(());
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, "{} request failed", operation);
        Err(RepositoryError::backend_with_detail(
            format!("{} failed with status {}", operation, status),
            error_body,
        ))
    }

    fn bulk_body(&self, items: &[Item]) -> Result<Vec<JsonBody<Value>>, RepositoryError> {
        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(items.len() * 2);
        for item in items {
            let document = serde_json::to_value(item).map_err(|e| {
                RepositoryError::backend(format!(
                    "Failed to encode document {}: {}",
                    item.document_id(),
                    e
                ))
            })?;
            body.push(json!({"index": {"_id": item.document_id()}}).into());
            body.push(document.into());
        }
        Ok(body)
    }
}

/// First per-document error reported in a `_bulk` response, if any.
pub(crate) fn first_bulk_error(response: &Value) -> Option<String> {
    if !response.get("errors").and_then(Value::as_bool).unwrap_or(false) {
        return None;
    }

    let first = response
        .get("items")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .filter_map(|item| item.get("index"))
                .find(|index| index.get("error").is_some())
        })
        .cloned()
        .unwrap_or_else(|| response.clone());

    Some(first.to_string())
}

/// Documents found in an `_mget` response, decoded as items.
pub(crate) fn found_documents(response: &Value) -> Result<Vec<Item>, RepositoryError> {
    let docs = response
        .get("docs")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            RepositoryError::backend_with_detail("Malformed mget response", response.to_string())
        })?;

    docs.iter()
        .filter(|doc| doc.get("found").and_then(Value::as_bool).unwrap_or(false))
        .filter_map(|doc| doc.get("_source"))
        .map(|source| {
            serde_json::from_value::<Item>(source.clone()).map_err(|e| {
                RepositoryError::backend_with_detail(
                    format!("Failed to decode stored document: {}", e),
                    source.to_string(),
                )
            })
        })
        .collect()
}

#[async_trait]
impl SearchBackend for OpenSearchBackend {
    async fn put(&self, items: &[Item]) -> Result<usize, RepositoryError> {
        if items.is_empty() {
            return Ok(0);
        }

        let body = self.bulk_body(items)?;
        let response = self
            .client
            .bulk(BulkParts::Index(&self.index_config.alias))
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Bulk request failed");
                RepositoryError::backend(e.to_string())
            })?;

        let status = response.status_code();
        let text = response
            .text()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;

        if !status.is_success() {
            error!(status = %status, body = %text, "Bulk request failed");
            return Err(RepositoryError::backend_with_detail(
                format!("Bulk request failed with status {}", status),
                text,
            ));
        }

        let response_body: Value = serde_json::from_str(&text).map_err(|e| {
            RepositoryError::backend_with_detail(
                format!("Unparsable bulk response: {}", e),
                text.clone(),
            )
        })?;

        if let Some(detail) = first_bulk_error(&response_body) {
            error!(detail = %detail, "Bulk request rejected documents");
            return Err(RepositoryError::backend_with_detail(
                "Bulk request rejected documents",
                detail,
            ));
        }

        debug!(count = items.len(), alias = %self.index_config.alias, "Bulk indexed items");
        Ok(items.len())
    }

    async fn query(&self, query: &ItemQuery) -> Result<Vec<Item>, RepositoryError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = query.uuids.iter().map(|uuid| uuid.composed_uuid()).collect();
        let response = self
            .client
            .mget(MgetParts::Index(&self.index_config.alias))
            .body(json!({ "ids": ids }))
            .send()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::backend_with_detail(
                format!("Mget request failed with status {}", status),
                error_body,
            ));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;
        found_documents(&response_body)
    }

    async fn refresh(&self) -> Result<(), RepositoryError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[self.index_config.alias.as_str()]))
            .send()
            .await
            .map_err(|e| RepositoryError::backend(e.to_string()))?;
        Self::expect_success(response, "Refresh").await
    }
}
