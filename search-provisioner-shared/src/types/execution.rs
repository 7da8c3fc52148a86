//! Indexer execution snapshots.
//!
//! These types mirror the payload of the indexer status endpoint. They are
//! read-only observations of remote state: the provisioner never mutates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Overall status of an indexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexerStatus {
    /// The indexer is enabled and may be executing.
    Running,
    /// The indexer hit an error that requires intervention.
    Error,
    /// Any other status, including an idle indexer.
    #[serde(other)]
    Unknown,
}

/// Status of a single indexer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexerExecutionStatus {
    InProgress,
    Success,
    #[serde(alias = "failed")]
    TransientFailure,
    Reset,
    #[serde(other)]
    Unknown,
}

impl IndexerExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexerExecutionStatus::InProgress => "inProgress",
            IndexerExecutionStatus::Success => "success",
            IndexerExecutionStatus::TransientFailure => "transientFailure",
            IndexerExecutionStatus::Reset => "reset",
            IndexerExecutionStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for IndexerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            IndexerStatus::Running => "running",
            IndexerStatus::Error => "error",
            IndexerStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

impl std::fmt::Display for IndexerExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A per-item warning reported by an indexer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemWarning {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// A per-item error reported by an indexer run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Result of one indexer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerExecutionResult {
    pub status: IndexerExecutionStatus,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub warnings: Vec<ItemWarning>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ItemError>,
    #[serde(default)]
    pub items_processed: i64,
    #[serde(default)]
    pub items_failed: i64,
}

impl IndexerExecutionResult {
    /// Create a result with no per-item diagnostics.
    pub fn new(status: IndexerExecutionStatus) -> Self {
        Self {
            status,
            error_message: None,
            start_time: None,
            end_time: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            items_processed: 0,
            items_failed: 0,
        }
    }
}

/// Snapshot returned by the indexer status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexerExecutionInfo {
    pub status: IndexerStatus,
    /// The most recent run, absent when no run has been recorded yet.
    #[serde(default)]
    pub last_result: Option<IndexerExecutionResult>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub execution_history: Vec<IndexerExecutionResult>,
}

impl IndexerExecutionInfo {
    pub fn new(status: IndexerStatus, last_result: Option<IndexerExecutionResult>) -> Self {
        Self {
            status,
            last_result,
            execution_history: Vec::new(),
        }
    }

    /// Status of the most recent run, if any.
    pub fn last_status(&self) -> Option<IndexerExecutionStatus> {
        self.last_result.as_ref().map(|r| r.status)
    }
}

/// The service sends `null` for empty diagnostic lists.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
