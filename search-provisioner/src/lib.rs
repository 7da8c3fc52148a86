//! # Search Provisioner
//!
//! Provisions the resources of a search service (data source, synonym map,
//! index, skillset and indexer) and waits for the indexer run that creating
//! them triggers.
//!
//! ## Architecture
//!
//! 1. **Orchestrator**: Applies a provisioning plan in dependency order
//! 2. **Monitor**: Polls the indexer until its run is terminal
//!
//! Both delegate the management API calls to the repository crate.
//!
//! ## Modules
//!
//! - [`config`]: Settings and dependency initialization
//! - [`monitor`]: Waits for indexer runs and reports their diagnostics
//! - [`orchestrator`]: Runs teardown and provisioning
//! - [`errors`]: Error types for the provisioner

pub mod config;
pub mod errors;
pub mod monitor;
pub mod orchestrator;

pub use config::{Dependencies, ProvisionerSettings};
pub use errors::ProvisioningError;
pub use monitor::{ExecutionMonitor, ExecutionOutcome, ExecutionReport, MonitorConfig};
pub use orchestrator::{Orchestrator, ProvisioningPlan, RunMode};
