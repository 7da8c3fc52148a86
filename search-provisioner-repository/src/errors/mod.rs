//! Error types for the search provisioner repository.
//!
//! This module provides a unified error type for all management API operations.

mod management_error;

pub use management_error::ManagementError;
