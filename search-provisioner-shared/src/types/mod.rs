//! This module defines the wire types used across the search provisioner.
//! It re-exports the resource definitions and the execution snapshot types.

pub mod data_source;
pub mod execution;
pub mod indexer;
pub mod resource_kind;

pub use data_source::DataSourceDefinition;
pub use execution::IndexerExecutionInfo;
pub use indexer::IndexerDefinition;
pub use resource_kind::ResourceKind;
