//! Monitor module for indexer executions.
//!
//! Polls the status of an indexer until its most recent run reaches a terminal
//! state, then classifies the outcome and reports per-item diagnostics.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

use search_provisioner_repository::{ManagementError, SearchServiceProvider};
use search_provisioner_shared::{
    IndexerExecutionInfo, IndexerExecutionStatus, IndexerStatus, ItemError, ItemWarning,
};

/// Default delay between two status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Default number of status requests before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

const RULE: &str = "--------------------------------------------------";

/// Configuration for the execution monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay before each status request.
    pub poll_interval: Duration,
    /// Maximum number of status requests for one wait.
    pub max_attempts: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Classified result of the last indexer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The indexer is running and its last run succeeded.
    Succeeded,
    /// The last run ended in any other terminal state.
    Failed { message: String },
    /// The indexer left the running state without ever recording a run.
    NoRunRecorded,
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded)
    }
}

impl std::fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionOutcome::Succeeded => write!(f, "succeeded"),
            ExecutionOutcome::Failed { message } => write!(f, "failed: {}", message),
            ExecutionOutcome::NoRunRecorded => write!(f, "no run recorded"),
        }
    }
}

/// What the monitor observed for one indexer.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub indexer: String,
    pub outcome: ExecutionOutcome,
    pub warnings: Vec<ItemWarning>,
    pub errors: Vec<ItemError>,
    /// Number of status requests issued.
    pub polls: u32,
}

impl ExecutionReport {
    /// Build the report for a terminal snapshot.
    pub fn from_snapshot(indexer: impl Into<String>, info: &IndexerExecutionInfo, polls: u32) -> Self {
        let (warnings, errors) = match &info.last_result {
            Some(result) => (result.warnings.clone(), result.errors.clone()),
            None => (Vec::new(), Vec::new()),
        };

        Self {
            indexer: indexer.into(),
            outcome: classify(info),
            warnings,
            errors,
            polls,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Human readable diagnostic lines: one per warning, then one per error,
    /// each followed by a rule line.
    pub fn diagnostic_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2 * (self.warnings.len() + self.errors.len()));

        for warning in &self.warnings {
            lines.push(match &warning.key {
                Some(key) => format!("Warning: {} ({})", warning.message, key),
                None => format!("Warning: {}", warning.message),
            });
            lines.push(RULE.to_string());
        }

        for item in &self.errors {
            lines.push(match &item.key {
                Some(key) => format!("Error: {} ({})", item.error_message, key),
                None => format!("Error: {}", item.error_message),
            });
            lines.push(RULE.to_string());
        }

        lines
    }
}

/// Whether a snapshot still describes a run in progress.
///
/// An indexer keeps being polled while it is running and has either no
/// recorded run yet or a run that is still in progress.
pub fn should_keep_polling(info: &IndexerExecutionInfo) -> bool {
    info.status == IndexerStatus::Running
        && matches!(
            info.last_status(),
            None | Some(IndexerExecutionStatus::InProgress)
        )
}

/// Classify a terminal snapshot.
pub fn classify(info: &IndexerExecutionInfo) -> ExecutionOutcome {
    let Some(last) = &info.last_result else {
        return ExecutionOutcome::NoRunRecorded;
    };

    if info.status == IndexerStatus::Running && last.status == IndexerExecutionStatus::Success {
        return ExecutionOutcome::Succeeded;
    }

    let message = match &last.error_message {
        Some(message) if !message.trim().is_empty() => message.clone(),
        _ => format!(
            "indexer status '{}', last run status '{}'",
            info.status, last.status
        ),
    };
    ExecutionOutcome::Failed { message }
}

/// Waits for indexer runs to finish.
pub struct ExecutionMonitor {
    provider: Arc<dyn SearchServiceProvider>,
    config: MonitorConfig,
}

impl ExecutionMonitor {
    /// Create a new monitor with default configuration.
    pub fn new(provider: Arc<dyn SearchServiceProvider>) -> Self {
        Self {
            provider,
            config: MonitorConfig::default(),
        }
    }

    /// Create a new monitor with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchServiceProvider>, config: MonitorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Block until the most recent run of `indexer_name` is terminal.
    ///
    /// Sleeps for the poll interval before every status request. A failed
    /// status request aborts the wait. A failed run is reported in the
    /// returned `ExecutionReport`, not as an error.
    ///
    /// # Returns
    ///
    /// * `Ok(ExecutionReport)` - Once a terminal snapshot was observed
    /// * `Err(ManagementError::PollLimitExceeded)` - If the run was still in
    ///   progress after `max_attempts` requests
    /// * `Err(ManagementError)` - If a status request failed
    #[instrument(skip(self), fields(poll_interval_secs = self.config.poll_interval.as_secs()))]
    pub async fn wait_for_completion(
        &self,
        indexer_name: &str,
    ) -> Result<ExecutionReport, ManagementError> {
        info!("Waiting for '{}' indexer to complete...", indexer_name);

        let mut polls: u32 = 0;
        loop {
            if polls >= self.config.max_attempts {
                return Err(ManagementError::poll_limit_exceeded(indexer_name, polls));
            }

            sleep(self.config.poll_interval).await;
            let info = self.provider.get_indexer_status(indexer_name).await?;
            polls += 1;

            info!(
                indexer = %indexer_name,
                poll = polls,
                status = %info.status,
                last_run_status = %info
                    .last_status()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "none".to_string()),
                "Indexer status"
            );

            if !should_keep_polling(&info) {
                let report = ExecutionReport::from_snapshot(indexer_name, &info, polls);
                log_report(&report);
                return Ok(report);
            }
        }
    }
}

/// Emit the outcome and every per-item diagnostic of a report.
fn log_report(report: &ExecutionReport) {
    match &report.outcome {
        ExecutionOutcome::Succeeded => {
            info!(indexer = %report.indexer, polls = report.polls, "Indexer run succeeded");
        }
        ExecutionOutcome::Failed { message } => {
            error!(
                indexer = %report.indexer,
                polls = report.polls,
                message = %message,
                "Indexer run failed"
            );
        }
        ExecutionOutcome::NoRunRecorded => {
            warn!(
                indexer = %report.indexer,
                polls = report.polls,
                "Indexer stopped without recording a run"
            );
        }
    }

    for line in report.diagnostic_lines() {
        info!("{}", line);
    }
}
