//! Orchestrator module for the search provisioner.
//!
//! Runs a provisioning plan against the search service: tears the resources
//! down in reverse dependency order, creates them in dependency order and
//! waits for the indexer run that creation triggers.

use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, instrument, warn};

use crate::errors::ProvisioningError;
use crate::monitor::{ExecutionMonitor, ExecutionOutcome, ExecutionReport};
use search_provisioner_repository::{DeleteOutcome, ResourceService, SkillsetParameters};
use search_provisioner_shared::{DataSourceDefinition, ResourceKind};

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Create every resource, then wait for the indexer run.
    Provision,
    /// Delete every resource of the plan.
    Teardown,
    /// Teardown followed by provision.
    Recreate,
    /// Only wait for the current indexer run.
    Wait,
}

impl FromStr for RunMode {
    type Err = ProvisioningError;

    /// Valid values: "provision", "teardown", "recreate" or "wait"
    /// (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "provision" | "create" => Ok(Self::Provision),
            "teardown" | "delete" => Ok(Self::Teardown),
            "recreate" => Ok(Self::Recreate),
            "wait" | "monitor" => Ok(Self::Wait),
            other => Err(ProvisioningError::config(format!(
                "Invalid run mode '{}', expected provision, teardown, recreate or wait",
                other
            ))),
        }
    }
}

/// A resource whose body comes from a template file.
#[derive(Debug, Clone)]
pub struct TemplatedResource {
    pub name: String,
    pub template: PathBuf,
}

impl TemplatedResource {
    pub fn new(name: impl Into<String>, template: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

/// Skillset template and the values it needs.
#[derive(Debug, Clone)]
pub struct SkillsetPlan {
    pub resource: TemplatedResource,
    pub parameters: SkillsetParameters,
}

/// How the indexer is created.
#[derive(Debug, Clone)]
pub enum IndexerPlan {
    /// Rendered from a template that references the plan's skillset.
    Templated(TemplatedResource),
    /// Plain indexer from data source to index.
    Simple { name: String },
}

impl IndexerPlan {
    pub fn name(&self) -> &str {
        match self {
            IndexerPlan::Templated(resource) => &resource.name,
            IndexerPlan::Simple { name } => name,
        }
    }
}

/// The full set of resources one provisioner run manages.
#[derive(Debug, Clone)]
pub struct ProvisioningPlan {
    pub data_source: DataSourceDefinition,
    pub synonym_map: Option<TemplatedResource>,
    pub index: TemplatedResource,
    pub skillset: Option<SkillsetPlan>,
    pub indexer: IndexerPlan,
}

impl ProvisioningPlan {
    /// Check that the plan is internally consistent.
    ///
    /// A templated indexer references a skillset, so the plan must carry one.
    pub fn validate(&self) -> Result<(), ProvisioningError> {
        if matches!(self.indexer, IndexerPlan::Templated(_)) && self.skillset.is_none() {
            return Err(ProvisioningError::config(format!(
                "Indexer '{}' is created from a template but no skillset is configured",
                self.indexer.name()
            )));
        }
        Ok(())
    }

    /// Name of the plan's resource of the given kind, if the plan has one.
    pub fn resource_name(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::DataSource => Some(&self.data_source.name),
            ResourceKind::SynonymMap => self.synonym_map.as_ref().map(|s| s.name.as_str()),
            ResourceKind::Index => Some(&self.index.name),
            ResourceKind::Skillset => self.skillset.as_ref().map(|s| s.resource.name.as_str()),
            ResourceKind::Indexer => Some(self.indexer.name()),
        }
    }
}

/// Result of deleting one resource during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownStep {
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: DeleteOutcome,
}

/// Orchestrator that applies a provisioning plan.
pub struct Orchestrator {
    service: ResourceService,
    monitor: ExecutionMonitor,
    plan: ProvisioningPlan,
}

impl Orchestrator {
    /// Create a new orchestrator for the given plan.
    pub fn new(
        service: ResourceService,
        monitor: ExecutionMonitor,
        plan: ProvisioningPlan,
    ) -> Result<Self, ProvisioningError> {
        plan.validate()?;
        Ok(Self {
            service,
            monitor,
            plan,
        })
    }

    /// Run the orchestrator in the given mode.
    ///
    /// A finished indexer run that did not succeed is returned as
    /// `ProvisioningError::RunFailed`.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(report))` - If the mode waited for a successful indexer run
    /// * `Ok(None)` - For teardown
    #[instrument(skip(self))]
    pub async fn run(&self, mode: RunMode) -> Result<Option<ExecutionReport>, ProvisioningError> {
        info!(mode = ?mode, "Starting search provisioner orchestrator");

        let report = match mode {
            RunMode::Teardown => {
                self.teardown().await?;
                return Ok(None);
            }
            RunMode::Provision => self.provision().await?,
            RunMode::Recreate => {
                self.teardown().await?;
                self.provision().await?
            }
            RunMode::Wait => self.wait().await?,
        };

        match &report.outcome {
            ExecutionOutcome::Succeeded => Ok(Some(report)),
            ExecutionOutcome::Failed { message } => {
                Err(ProvisioningError::run_failed(&report.indexer, message))
            }
            ExecutionOutcome::NoRunRecorded => Err(ProvisioningError::run_failed(
                &report.indexer,
                "the indexer stopped without recording a run",
            )),
        }
    }

    /// Delete every resource of the plan, dependents first.
    ///
    /// Resources that are already absent are reported and skipped; any other
    /// rejection stops the teardown.
    #[instrument(skip(self))]
    pub async fn teardown(&self) -> Result<Vec<TeardownStep>, ProvisioningError> {
        let mut steps = Vec::new();

        for kind in ResourceKind::teardown_order() {
            let Some(name) = self.plan.resource_name(kind) else {
                continue;
            };

            let outcome = self.service.delete(kind, name).await?;
            if outcome == DeleteOutcome::NotFound {
                info!(kind = %kind, name = %name, "Nothing to delete");
            }

            steps.push(TeardownStep {
                kind,
                name: name.to_string(),
                outcome,
            });
        }

        let deleted = steps
            .iter()
            .filter(|s| s.outcome == DeleteOutcome::Deleted)
            .count();
        info!(
            deleted = deleted,
            not_found = steps.len() - deleted,
            "Teardown complete"
        );

        Ok(steps)
    }

    /// Create every resource of the plan in dependency order, then wait for
    /// the indexer run.
    #[instrument(skip(self))]
    pub async fn provision(&self) -> Result<ExecutionReport, ProvisioningError> {
        let plan = &self.plan;

        self.service
            .create_or_update_data_source(&plan.data_source)
            .await?;

        if let Some(synonym_map) = &plan.synonym_map {
            self.service
                .create_synonym_map_from_template(&synonym_map.name, &synonym_map.template)
                .await?;
        }

        self.service
            .create_index_from_template(
                &plan.index.name,
                &plan.index.template,
                plan.synonym_map.as_ref().map(|s| s.name.as_str()),
            )
            .await?;

        if let Some(skillset) = &plan.skillset {
            self.service
                .create_skillset_from_template(
                    &skillset.resource.name,
                    &skillset.resource.template,
                    &skillset.parameters,
                )
                .await?;
        }

        match (&plan.indexer, &plan.skillset) {
            (IndexerPlan::Templated(indexer), Some(skillset)) => {
                self.service
                    .create_indexer_from_template(
                        &indexer.name,
                        &indexer.template,
                        &plan.data_source.name,
                        &plan.index.name,
                        &skillset.resource.name,
                    )
                    .await?;
            }
            (IndexerPlan::Templated(indexer), None) => {
                return Err(ProvisioningError::config(format!(
                    "Indexer '{}' is created from a template but no skillset is configured",
                    indexer.name
                )));
            }
            (IndexerPlan::Simple { name }, _) => {
                if plan.skillset.is_some() {
                    warn!(indexer = %name, "Skillset is provisioned but not attached to the indexer");
                }
                self.service
                    .create_indexer(name, &plan.data_source.name, &plan.index.name)
                    .await?;
            }
        }

        info!("All resources created");
        self.wait().await
    }

    /// Wait for the plan's indexer run to finish.
    pub async fn wait(&self) -> Result<ExecutionReport, ProvisioningError> {
        Ok(self
            .monitor
            .wait_for_completion(self.plan.indexer.name())
            .await?)
    }
}
