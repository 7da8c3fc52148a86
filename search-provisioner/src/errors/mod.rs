//! Error types for the search provisioner.

use search_provisioner_repository::ManagementError;
use thiserror::Error;

/// Errors that can occur while configuring or running the provisioner.
#[derive(Error, Debug)]
pub enum ProvisioningError {
    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A management API operation failed.
    #[error("Management error: {0}")]
    ManagementError(#[from] ManagementError),

    /// The indexer run ended in a non-successful terminal state.
    #[error("Indexer '{indexer}' run failed: {message}")]
    RunFailed { indexer: String, message: String },
}

impl ProvisioningError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a run failure.
    pub fn run_failed(indexer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RunFailed {
            indexer: indexer.into(),
            message: message.into(),
        }
    }
}
