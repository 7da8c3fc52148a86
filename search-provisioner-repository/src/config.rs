//! Configuration types for the management API client and the resource service.

use search_provisioner_shared::ResourceKind;
use url::Url;

use crate::errors::ManagementError;

/// Management API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2019-05-06-Preview";

/// DNS suffix appended to a bare service name.
pub const DEFAULT_DNS_SUFFIX: &str = "search.windows.net";

/// Connection settings for one search service.
///
/// The admin key is a secret supplied from outside; it is never printed by the
/// `Debug` implementation.
#[derive(Clone)]
pub struct SearchServiceConfig {
    /// Root URI of the service, e.g. `https://my-service.search.windows.net`.
    pub service_url: Url,
    /// Admin API key sent in the `api-key` header.
    pub api_key: String,
    /// Value of the `api-version` query parameter.
    pub api_version: String,
}

impl std::fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("service_url", &self.service_url.as_str())
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl SearchServiceConfig {
    /// Create a configuration for an explicit service URL.
    ///
    /// # Arguments
    ///
    /// * `service_url` - Root URI of the search service
    /// * `api_key` - Admin API key
    ///
    /// # Returns
    ///
    /// * `Ok(SearchServiceConfig)` - With the default API version
    /// * `Err(ManagementError::ValidationError)` - If the URL is not absolute or the key is empty
    pub fn new(service_url: &str, api_key: impl Into<String>) -> Result<Self, ManagementError> {
        let service_url = Url::parse(service_url).map_err(|e| {
            ManagementError::validation(format!("Invalid service URL '{}': {}", service_url, e))
        })?;
        if service_url.cannot_be_a_base() {
            return Err(ManagementError::validation(format!(
                "Service URL '{}' cannot be used as a base URL",
                service_url
            )));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ManagementError::validation("API key is required"));
        }

        Ok(Self {
            service_url,
            api_key,
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Create a configuration from a bare service name.
    ///
    /// The URI is built as `https://{service_name}.search.windows.net`.
    pub fn for_service_name(
        service_name: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ManagementError> {
        if service_name.trim().is_empty() {
            return Err(ManagementError::validation("Service name is required"));
        }
        Self::new(
            &format!("https://{}.{}", service_name.trim(), DEFAULT_DNS_SUFFIX),
            api_key,
        )
    }

    /// Override the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// URL of the named resource: `{service}/{collection}/{name}?api-version={version}`.
    pub fn resource_url(&self, kind: ResourceKind, name: &str) -> Result<Url, ManagementError> {
        self.build_url(&[kind.collection(), name])
    }

    /// URL of an indexer's execution status.
    pub fn indexer_status_url(&self, indexer_name: &str) -> Result<Url, ManagementError> {
        self.build_url(&[ResourceKind::Indexer.collection(), indexer_name, "status"])
    }

    fn build_url(&self, segments: &[&str]) -> Result<Url, ManagementError> {
        let mut url = self.service_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ManagementError::validation(format!(
                    "Service URL '{}' cannot be used as a base URL",
                    self.service_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .clear()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }
}

/// Configuration for the `ResourceService`.
#[derive(Debug, Clone)]
pub struct ResourceServiceConfig {
    /// Check that referenced resources exist before submitting a resource
    /// that depends on them.
    ///
    /// Defaults to `true`. When disabled, violations surface only as
    /// rejections from the remote API.
    pub verify_dependencies: bool,
}

impl Default for ResourceServiceConfig {
    fn default() -> Self {
        Self {
            verify_dependencies: true,
        }
    }
}

impl ResourceServiceConfig {
    /// Create a config that skips dependency checks.
    pub fn without_dependency_checks() -> Self {
        Self {
            verify_dependencies: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_service_name() {
        let config = SearchServiceConfig::for_service_name("my-search", "key").unwrap();

        assert_eq!(
            config.service_url.as_str(),
            "https://my-search.search.windows.net/"
        );
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
    }

    #[test]
    fn test_resource_url() {
        let config = SearchServiceConfig::for_service_name("my-search", "key")
            .unwrap()
            .with_api_version("2020-06-30");

        let url = config.resource_url(ResourceKind::Skillset, "enrich").unwrap();

        assert_eq!(
            url.as_str(),
            "https://my-search.search.windows.net/skillsets/enrich?api-version=2020-06-30"
        );
    }

    #[test]
    fn test_resource_url_keeps_base_path() {
        let config = SearchServiceConfig::new("http://localhost:8080/proxy/", "key").unwrap();

        let url = config.resource_url(ResourceKind::Index, "docs").unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/indexes/docs?api-version=2019-05-06-Preview"
        );
    }

    #[test]
    fn test_resource_url_encodes_name() {
        let config = SearchServiceConfig::new("http://localhost:8080", "key").unwrap();

        let url = config
            .resource_url(ResourceKind::SynonymMap, "a b/c")
            .unwrap();

        assert_eq!(url.path(), "/synonymmaps/a%20b%2Fc");
    }

    #[test]
    fn test_indexer_status_url() {
        let config = SearchServiceConfig::new("http://localhost:8080", "key").unwrap();

        let url = config.indexer_status_url("docs-indexer").unwrap();

        assert_eq!(url.path(), "/indexers/docs-indexer/status");
        assert_eq!(url.query(), Some("api-version=2019-05-06-Preview"));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            SearchServiceConfig::new("not a url", "key"),
            Err(ManagementError::ValidationError(_))
        ));
        assert!(matches!(
            SearchServiceConfig::new("http://localhost", "  "),
            Err(ManagementError::ValidationError(_))
        ));
        assert!(matches!(
            SearchServiceConfig::for_service_name("", "key"),
            Err(ManagementError::ValidationError(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = SearchServiceConfig::new("http://localhost", "super-secret").unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_resource_service_config() {
        assert!(ResourceServiceConfig::default().verify_dependencies);
        assert!(!ResourceServiceConfig::without_dependency_checks().verify_dependencies);
    }
}
