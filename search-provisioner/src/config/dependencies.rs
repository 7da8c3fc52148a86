//! Dependency initialization and wiring for the search provisioner.

use std::sync::Arc;
use tracing::info;

use super::ProvisionerSettings;
use crate::monitor::ExecutionMonitor;
use crate::orchestrator::{Orchestrator, RunMode};
use crate::ProvisioningError;
use search_provisioner_repository::{AzureSearchProvider, ResourceService, SearchServiceProvider};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// The mode read from the environment.
    pub mode: RunMode,
}

impl Dependencies {
    /// Initialize all dependencies from environment variables.
    ///
    /// See [`ProvisionerSettings::from_env`] for the variables read.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(ProvisioningError)` - If the configuration is missing or invalid
    pub fn new() -> Result<Self, ProvisioningError> {
        let settings = ProvisionerSettings::from_env()?;
        Self::from_settings(settings)
    }

    /// Wire the live provider, resource service, monitor and orchestrator.
    pub fn from_settings(settings: ProvisionerSettings) -> Result<Self, ProvisioningError> {
        info!(
            service_url = %settings.service.service_url,
            api_version = %settings.service.api_version,
            mode = ?settings.mode,
            poll_interval_secs = settings.monitor.poll_interval.as_secs(),
            max_poll_attempts = settings.monitor.max_attempts,
            verify_dependencies = settings.resources.verify_dependencies,
            "Initializing dependencies"
        );

        let provider: Arc<dyn SearchServiceProvider> =
            Arc::new(AzureSearchProvider::new(settings.service)?);

        let service = ResourceService::with_config(Arc::clone(&provider), settings.resources);
        let monitor = ExecutionMonitor::with_config(provider, settings.monitor);
        let orchestrator = Orchestrator::new(service, monitor, settings.plan)?;

        Ok(Self {
            orchestrator,
            mode: settings.mode,
        })
    }
}
