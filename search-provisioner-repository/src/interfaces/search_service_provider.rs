//! Search service provider trait definition.
//!
//! This module defines the abstract interface to the management API of a
//! search service, covering both the raw templated path and the structured
//! (typed) path.

use async_trait::async_trait;
use search_provisioner_shared::{
    DataSourceDefinition, IndexerDefinition, IndexerExecutionInfo, ResourceKind,
};

use crate::errors::ManagementError;
use crate::types::DeleteOutcome;

/// Abstracts the transport to a search service management API.
///
/// Implementations are injected into `ResourceService` so that the
/// orchestration logic can be tested against in-memory mocks.
///
/// All methods return `Result<T, ManagementError>`. No method retries: a
/// rejected request is `ManagementError::ApiRejected`, a request that never
/// produced a response is `ManagementError::TransportFailure`.
#[async_trait]
pub trait SearchServiceProvider: Send + Sync {
    /// Submit a pre-rendered JSON body with `PUT` to the named resource.
    ///
    /// This is the raw path used for template-driven resource kinds. The body
    /// is sent verbatim.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the service answered with a success status
    /// * `Err(ManagementError)` - If the request was rejected or failed
    async fn put_resource(
        &self,
        kind: ResourceKind,
        name: &str,
        body: String,
    ) -> Result<(), ManagementError>;

    /// Delete the named resource.
    ///
    /// # Returns
    ///
    /// * `Ok(DeleteOutcome::Deleted)` - If the resource was removed
    /// * `Ok(DeleteOutcome::NotFound)` - If the resource did not exist
    /// * `Err(ManagementError)` - On any other rejection or transport failure
    async fn delete_resource(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<DeleteOutcome, ManagementError>;

    /// Check whether the named resource exists.
    async fn resource_exists(&self, kind: ResourceKind, name: &str)
        -> Result<bool, ManagementError>;

    /// Create or replace a data source through the structured path.
    async fn create_or_update_data_source(
        &self,
        definition: &DataSourceDefinition,
    ) -> Result<(), ManagementError>;

    /// Create or replace an indexer through the structured path.
    ///
    /// Creating an indexer also schedules its first run.
    async fn create_or_update_indexer(
        &self,
        definition: &IndexerDefinition,
    ) -> Result<(), ManagementError>;

    /// Fetch the current execution snapshot of an indexer.
    async fn get_indexer_status(
        &self,
        indexer_name: &str,
    ) -> Result<IndexerExecutionInfo, ManagementError>;
}
