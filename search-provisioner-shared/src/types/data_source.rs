//! Data source definitions.
//!
//! A data source is a named pointer to an external store that an indexer
//! crawls. Two store kinds are supported: blob containers and change-tracked
//! document collections.

use serde::{Deserialize, Serialize};

/// Column used as the high-water mark for document store change tracking.
pub const DOCUMENT_STORE_HIGH_WATER_MARK_COLUMN: &str = "_ts";

/// The backing store of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSourceKind {
    /// Object storage container.
    #[serde(rename = "azureblob")]
    Blob,
    /// Change-tracked document collection.
    #[serde(rename = "cosmosdb")]
    DocumentStore,
}

impl DataSourceKind {
    /// Returns the type string expected by the management API.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSourceKind::Blob => "azureblob",
            DataSourceKind::DocumentStore => "cosmosdb",
        }
    }
}

impl std::fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials used by the service to reach the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceCredentials {
    pub connection_string: String,
}

impl std::fmt::Debug for DataSourceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceCredentials")
            .field("connection_string", &"<redacted>")
            .finish()
    }
}

/// The container or collection crawled within the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataContainer {
    pub name: String,
    /// Optional virtual directory (blob) or query (document store).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Change detection policy attached to document store data sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "@odata.type")]
pub enum ChangeDetectionPolicy {
    #[serde(rename = "#Microsoft.Azure.Search.HighWaterMarkChangeDetectionPolicy")]
    HighWaterMark {
        #[serde(rename = "highWaterMarkColumnName")]
        column: String,
    },
}

/// Body of a data source create-or-update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataSourceKind,
    pub credentials: DataSourceCredentials,
    pub container: DataContainer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_change_detection_policy: Option<ChangeDetectionPolicy>,
}

impl DataSourceDefinition {
    /// Create a blob container data source.
    ///
    /// # Example
    ///
    /// ```
    /// use search_provisioner_shared::{DataSourceDefinition, DataSourceKind};
    ///
    /// let source = DataSourceDefinition::blob("docs", "account", "secret", "container");
    /// assert_eq!(source.kind, DataSourceKind::Blob);
    /// assert_eq!(source.container.name, "container");
    /// ```
    pub fn blob(
        name: impl Into<String>,
        storage_account_name: &str,
        storage_account_key: &str,
        container_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DataSourceKind::Blob,
            credentials: DataSourceCredentials {
                connection_string: format!(
                    "DefaultEndpointsProtocol=https;AccountName={};AccountKey={};",
                    storage_account_name, storage_account_key
                ),
            },
            container: DataContainer {
                name: container_name.into(),
                query: None,
            },
            data_change_detection_policy: None,
        }
    }

    /// Create a document store data source.
    ///
    /// When `track_changes` is set, a high-water-mark policy on the `_ts`
    /// column is attached so that subsequent runs only pick up modified
    /// documents.
    pub fn document_store(
        name: impl Into<String>,
        connection_string: &str,
        database_name: &str,
        collection_name: impl Into<String>,
        track_changes: bool,
    ) -> Self {
        let data_change_detection_policy = track_changes.then(|| {
            ChangeDetectionPolicy::HighWaterMark {
                column: DOCUMENT_STORE_HIGH_WATER_MARK_COLUMN.to_string(),
            }
        });

        Self {
            name: name.into(),
            kind: DataSourceKind::DocumentStore,
            credentials: DataSourceCredentials {
                connection_string: format!(
                    "{};Database={}",
                    connection_string.trim_end_matches(';'),
                    database_name
                ),
            },
            container: DataContainer {
                name: collection_name.into(),
                query: None,
            },
            data_change_detection_policy,
        }
    }

    /// Restrict the crawl to a virtual directory or query.
    pub fn with_container_query(mut self, query: impl Into<String>) -> Self {
        self.container.query = Some(query.into());
        self
    }
}
