//! Indexer definitions.

use serde::{Deserialize, Serialize};

/// Body of a structured indexer create-or-update request.
///
/// An indexer binds exactly one data source to one target index, optionally
/// running documents through a skillset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerDefinition {
    pub name: String,
    pub data_source_name: String,
    pub target_index_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skillset_name: Option<String>,
}

impl IndexerDefinition {
    /// Create an indexer without a skillset.
    pub fn new(
        name: impl Into<String>,
        data_source_name: impl Into<String>,
        target_index_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_source_name: data_source_name.into(),
            target_index_name: target_index_name.into(),
            skillset_name: None,
        }
    }
}
