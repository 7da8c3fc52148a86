//! # Search Provisioner Shared
//!
//! This crate defines the data structures exchanged with the search service
//! management API: resource kinds and their dependency graph, data source and
//! indexer definitions, and indexer execution snapshots.

pub mod types;

pub use types::data_source::{
    ChangeDetectionPolicy, DataContainer, DataSourceCredentials, DataSourceDefinition,
    DataSourceKind,
};
pub use types::execution::{
    IndexerExecutionInfo, IndexerExecutionResult, IndexerExecutionStatus, IndexerStatus,
    ItemError, ItemWarning,
};
pub use types::indexer::IndexerDefinition;
pub use types::resource_kind::ResourceKind;
