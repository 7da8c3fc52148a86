//! Azure Cognitive Search provider implementation.
//!
//! This module provides the concrete implementation of `SearchServiceProvider`
//! on top of the REST management API, authenticated with a static admin key.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, StatusCode};
use search_provisioner_shared::{
    DataSourceDefinition, IndexerDefinition, IndexerExecutionInfo, ResourceKind,
};
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use crate::config::SearchServiceConfig;
use crate::errors::ManagementError;
use crate::interfaces::SearchServiceProvider;
use crate::response;
use crate::types::DeleteOutcome;

/// Header carrying the admin key.
const API_KEY_HEADER: &str = "api-key";

/// Azure Cognitive Search provider implementation.
///
/// Every request targets `{service}/{collection}/{name}?api-version={version}`
/// and carries the `api-key` header.
///
/// # Example
///
/// ```ignore
/// use search_provisioner_repository::{AzureSearchProvider, SearchServiceConfig};
///
/// let config = SearchServiceConfig::for_service_name("my-search", admin_key)?;
/// let provider = AzureSearchProvider::new(config)?;
///
/// let status = provider.get_indexer_status("docs-indexer").await?;
/// ```
pub struct AzureSearchProvider {
    client: Client,
    config: SearchServiceConfig,
}

impl AzureSearchProvider {
    /// Create a new provider for the configured service.
    ///
    /// # Arguments
    ///
    /// * `config` - Service URL, admin key and API version
    ///
    /// # Returns
    ///
    /// * `Ok(AzureSearchProvider)` - A new provider instance
    /// * `Err(ManagementError)` - If the HTTP client cannot be built
    pub fn new(config: SearchServiceConfig) -> Result<Self, ManagementError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ManagementError::transport(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a provider that reuses an existing HTTP client.
    pub fn with_client(client: Client, config: SearchServiceConfig) -> Self {
        info!(
            service_url = %config.service_url,
            api_version = %config.api_version,
            "Created search service provider"
        );

        Self { client, config }
    }

    /// Attach the admin key, send the request and read the full body.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), ManagementError> {
        let response = request
            .header(API_KEY_HEADER, &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    /// `PUT` a JSON body and classify the response.
    async fn put_json(&self, url: Url, body: String) -> Result<(), ManagementError> {
        let request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let (status, response_body) = self.send(request).await?;

        if let Err(e) = response::ensure_success(status, &response_body) {
            error!(
                url = %url.path(),
                status = %status,
                body = %response_body,
                "Create-or-update request rejected"
            );
            return Err(e);
        }

        debug!(url = %url.path(), status = %status, "Create-or-update request accepted");
        Ok(())
    }

    /// Serialize a typed definition and `PUT` it.
    async fn put_structured<T: Serialize + Sync>(
        &self,
        kind: ResourceKind,
        name: &str,
        definition: &T,
    ) -> Result<(), ManagementError> {
        let body = serde_json::to_string(definition)
            .map_err(|e| ManagementError::serialization(e.to_string()))?;
        let url = self.config.resource_url(kind, name)?;
        self.put_json(url, body).await
    }
}

#[async_trait]
impl SearchServiceProvider for AzureSearchProvider {
    async fn put_resource(
        &self,
        kind: ResourceKind,
        name: &str,
        body: String,
    ) -> Result<(), ManagementError> {
        let url = self.config.resource_url(kind, name)?;
        self.put_json(url, body).await
    }

    async fn delete_resource(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<DeleteOutcome, ManagementError> {
        let url = self.config.resource_url(kind, name)?;
        let (status, body) = self.send(self.client.delete(url)).await?;

        info!(
            kind = %kind,
            name = %name,
            status = %status,
            body = %body,
            "Delete request completed"
        );

        response::classify_delete(status, &body)
    }

    async fn resource_exists(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<bool, ManagementError> {
        let url = self.config.resource_url(kind, name)?;
        let (status, body) = self.send(self.client.get(url)).await?;

        match response::ensure_success(status, &body) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn create_or_update_data_source(
        &self,
        definition: &DataSourceDefinition,
    ) -> Result<(), ManagementError> {
        self.put_structured(ResourceKind::DataSource, &definition.name, definition)
            .await
    }

    async fn create_or_update_indexer(
        &self,
        definition: &IndexerDefinition,
    ) -> Result<(), ManagementError> {
        self.put_structured(ResourceKind::Indexer, &definition.name, definition)
            .await
    }

    async fn get_indexer_status(
        &self,
        indexer_name: &str,
    ) -> Result<IndexerExecutionInfo, ManagementError> {
        let url = self.config.indexer_status_url(indexer_name)?;
        let (status, body) = self.send(self.client.get(url)).await?;

        response::ensure_success(status, &body)?;

        serde_json::from_str(&body).map_err(|e| {
            ManagementError::parse(format!(
                "Invalid status payload for indexer '{}': {}",
                indexer_name, e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use search_provisioner_shared::{IndexerExecutionStatus, IndexerStatus};
    use serde_json::json;

    const API_KEY: &str = "test-admin-key";

    /// Body captured from the service when deleting a missing indexer.
    const INDEXER_NOT_FOUND: &str = r#"{"error":{"code":"","message":"Indexer 'missing' was not found in service 'my-search'."}}"#;

    fn provider_for(server: &Server) -> AzureSearchProvider {
        let config = SearchServiceConfig::new(&server.url(), API_KEY).unwrap();
        AzureSearchProvider::new(config).unwrap()
    }

    /// Match a request path regardless of the query string.
    fn path(p: &str) -> Matcher {
        Matcher::Regex(format!(r"^{}(\?.*)?$", p))
    }

    #[tokio::test]
    async fn test_put_resource_sends_body_verbatim() {
        let mut server = Server::new_async().await;
        let body = r#"{"name":"syn1","format":"solr","synonyms":"USA, United States"}"#;
        let mock = server
            .mock("PUT", path("/synonymmaps/syn1"))
            .match_query(Matcher::UrlEncoded(
                "api-version".into(),
                "2019-05-06-Preview".into(),
            ))
            .match_header("api-key", API_KEY)
            .match_header("content-type", "application/json")
            .match_body(body)
            .with_status(201)
            .with_body(body)
            .create_async()
            .await;

        let provider = provider_for(&server);
        provider
            .put_resource(ResourceKind::SynonymMap, "syn1", body.to_string())
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_resource_twice_is_accepted() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", path("/indexes/docs"))
            .with_status(204)
            .expect(2)
            .create_async()
            .await;

        let provider = provider_for(&server);
        for _ in 0..2 {
            provider
                .put_resource(ResourceKind::Index, "docs", "{}".to_string())
                .await
                .unwrap();
        }

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_put_resource_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("PUT", path("/skillsets/enrich"))
            .with_status(400)
            .with_body(r#"{"error":{"code":"","message":"One or more skills are invalid."}}"#)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .put_resource(ResourceKind::Skillset, "enrich", "{}".to_string())
            .await
            .unwrap_err();

        match err {
            ManagementError::ApiRejected { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "One or more skills are invalid.");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_or_update_data_source_is_structured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", path("/datasources/docs"))
            .match_header("api-key", API_KEY)
            .match_body(Matcher::PartialJson(json!({
                "name": "docs",
                "type": "azureblob",
                "container": { "name": "files" }
            })))
            .with_status(201)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let definition = DataSourceDefinition::blob("docs", "acc", "key", "files");
        provider
            .create_or_update_data_source(&definition)
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_or_update_indexer_is_structured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", path("/indexers/docs-indexer"))
            .match_body(Matcher::Json(json!({
                "name": "docs-indexer",
                "dataSourceName": "docs",
                "targetIndexName": "docs-index"
            })))
            .with_status(200)
            .create_async()
            .await;

        let provider = provider_for(&server);
        provider
            .create_or_update_indexer(&IndexerDefinition::new("docs-indexer", "docs", "docs-index"))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_missing_resource_of_each_kind() {
        let mut server = Server::new_async().await;
        let provider = provider_for(&server);

        for kind in ResourceKind::CREATION_ORDER {
            let mock = server
                .mock("DELETE", path(&format!("/{}/missing", kind.collection())))
                .match_header("api-key", API_KEY)
                .with_status(404)
                .with_body(INDEXER_NOT_FOUND)
                .create_async()
                .await;

            let outcome = provider.delete_resource(kind, "missing").await.unwrap();

            assert_eq!(outcome, DeleteOutcome::NotFound, "{}", kind);
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_delete_existing_resource() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", path("/indexers/docs-indexer"))
            .with_status(204)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let outcome = provider
            .delete_resource(ResourceKind::Indexer, "docs-indexer")
            .await
            .unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    #[tokio::test]
    async fn test_delete_forbidden_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("DELETE", path("/indexes/docs"))
            .with_status(403)
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider
            .delete_resource(ResourceKind::Index, "docs")
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_resource_exists() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", path("/indexes/present"))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;
        server
            .mock("GET", path("/indexes/absent"))
            .with_status(404)
            .create_async()
            .await;

        let provider = provider_for(&server);

        assert!(provider
            .resource_exists(ResourceKind::Index, "present")
            .await
            .unwrap());
        assert!(!provider
            .resource_exists(ResourceKind::Index, "absent")
            .await
            .unwrap());

        server
            .mock("GET", path("/indexes/locked"))
            .with_status(403)
            .with_body(r#"{"error": {"message": "Forbidden"}}"#)
            .create_async()
            .await;
        let err = provider
            .resource_exists(ResourceKind::Index, "locked")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_indexer_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", path("/indexers/docs-indexer/status"))
            .match_header("api-key", API_KEY)
            .with_status(200)
            .with_body(
                json!({
                    "status": "running",
                    "lastResult": {
                        "status": "transientFailure",
                        "errorMessage": "Skill failed",
                        "errors": [
                            { "key": "doc-1", "errorMessage": "Could not read", "statusCode": 400 }
                        ],
                        "warnings": null
                    },
                    "executionHistory": []
                })
                .to_string(),
            )
            .create_async()
            .await;

        let provider = provider_for(&server);
        let info = provider.get_indexer_status("docs-indexer").await.unwrap();

        assert_eq!(info.status, IndexerStatus::Running);
        assert_eq!(
            info.last_status(),
            Some(IndexerExecutionStatus::TransientFailure)
        );
        let last = info.last_result.unwrap();
        assert_eq!(last.errors.len(), 1);
        assert_eq!(last.errors[0].status_code, Some(400));
        assert!(last.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_get_indexer_status_invalid_payload() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", path("/indexers/docs-indexer/status"))
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let provider = provider_for(&server);
        let err = provider.get_indexer_status("docs-indexer").await.unwrap_err();

        assert!(matches!(err, ManagementError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let config = SearchServiceConfig::new("http://127.0.0.1:1", API_KEY).unwrap();
        let provider = AzureSearchProvider::new(config).unwrap();

        let err = provider
            .put_resource(ResourceKind::Index, "docs", "{}".to_string())
            .await
            .unwrap_err();

        assert!(matches!(err, ManagementError::TransportFailure(_)));
    }
}
