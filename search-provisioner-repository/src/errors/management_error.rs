//! Management API error types.
//!
//! This module defines the unified error type for every operation against the
//! search service management API, covering transport failures, rejected
//! requests, template problems and local dependency checks.

use search_provisioner_shared::ResourceKind;
use thiserror::Error;

/// Unified errors from management API operations.
///
/// Used by the `SearchServiceProvider` trait and the `ResourceService`. No
/// variant is retried locally: every failure surfaces to the immediate caller.
#[derive(Debug, Clone, Error)]
pub enum ManagementError {
    /// The management API answered with a non-success status.
    #[error("API rejected request with status {status}: {message}")]
    ApiRejected { status: u16, message: String },

    /// The request never produced a response (connection, TLS, timeout...).
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// A template file could not be read.
    #[error("Template '{path}' could not be read: {reason}")]
    TemplateMissing { path: String, reason: String },

    /// A template rendered into an invalid request body.
    #[error("Template '{path}' is malformed: {reason}")]
    TemplateMalformed { path: String, reason: String },

    /// A resource referenced by the submitted resource does not exist.
    #[error("{kind} '{name}' required by {required_by} does not exist")]
    DependencyMissing {
        kind: ResourceKind,
        name: String,
        required_by: String,
    },

    /// Validation error (e.g., empty resource names, invalid URLs).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The indexer did not reach a terminal state within the polling bound.
    #[error("Indexer '{indexer}' still running after {attempts} status checks")]
    PollLimitExceeded { indexer: String, attempts: u32 },
}

impl ManagementError {
    /// Create an API rejection error.
    pub fn api_rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRejected {
            status,
            message: message.into(),
        }
    }

    /// Create a transport failure.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportFailure(msg.into())
    }

    /// Create a template missing error.
    pub fn template_missing(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateMissing {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a template malformed error.
    pub fn template_malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::TemplateMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing dependency error.
    pub fn dependency_missing(
        kind: ResourceKind,
        name: impl Into<String>,
        required_by: impl Into<String>,
    ) -> Self {
        Self::DependencyMissing {
            kind,
            name: name.into(),
            required_by: required_by.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::SerializationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a poll limit error.
    pub fn poll_limit_exceeded(indexer: impl Into<String>, attempts: u32) -> Self {
        Self::PollLimitExceeded {
            indexer: indexer.into(),
            attempts,
        }
    }

    /// HTTP status of an API rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiRejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the API rejected the request because the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for ManagementError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure(err.to_string())
    }
}
