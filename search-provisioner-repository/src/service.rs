//! Resource service implementation.
//!
//! This module provides the main service for provisioning resources on a
//! search service. Each resource kind has a create-or-update operation and a
//! delete operation. Simple kinds go through the structured client; kinds
//! whose bodies come from external JSON templates are rendered locally and
//! submitted verbatim.

use std::path::Path;
use std::sync::Arc;

use search_provisioner_shared::{
    DataSourceDefinition, IndexerDefinition, IndexerExecutionInfo, ResourceKind,
};
use tracing::info;

use crate::config::ResourceServiceConfig;
use crate::errors::ManagementError;
use crate::interfaces::SearchServiceProvider;
use crate::template::{self, Placeholder, TemplateParameters};
use crate::types::{DeleteOutcome, SkillsetParameters};

/// The main service for provisioning search service resources.
///
/// This is the high-level API that application code should use. It validates
/// names, renders templates, checks that referenced resources exist and
/// delegates the actual requests to a `SearchServiceProvider`.
///
/// Every create-or-update is idempotent: submitting the same name twice
/// replaces the resource in place.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use search_provisioner_repository::{
///     AzureSearchProvider, ResourceService, SearchServiceConfig,
/// };
/// use search_provisioner_shared::DataSourceDefinition;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SearchServiceConfig::for_service_name("my-search", "admin-key")?;
/// let provider = Arc::new(AzureSearchProvider::new(config)?);
/// let service = ResourceService::new(provider);
///
/// service
///     .create_or_update_data_source(&DataSourceDefinition::blob(
///         "docs", "account", "key", "container",
///     ))
///     .await?;
/// service
///     .create_index_from_template("docs-index", Path::new("index.json"), None)
///     .await?;
/// service.create_indexer("docs-indexer", "docs", "docs-index").await?;
/// # Ok(())
/// # }
/// ```
pub struct ResourceService {
    provider: Arc<dyn SearchServiceProvider>,
    config: ResourceServiceConfig,
}

impl ResourceService {
    /// Create a new ResourceService with default configuration.
    ///
    /// The default configuration verifies dependencies before submission.
    pub fn new(provider: Arc<dyn SearchServiceProvider>) -> Self {
        Self {
            provider,
            config: ResourceServiceConfig::default(),
        }
    }

    /// Create a new ResourceService with custom configuration.
    pub fn with_config(
        provider: Arc<dyn SearchServiceProvider>,
        config: ResourceServiceConfig,
    ) -> Self {
        Self { provider, config }
    }

    /// Validate that a resource name is present.
    fn validate_name(kind: ResourceKind, name: &str) -> Result<(), ManagementError> {
        if name.trim().is_empty() {
            return Err(ManagementError::validation(format!(
                "{} name is required",
                kind
            )));
        }
        Ok(())
    }

    /// Fail with `DependencyMissing` if a referenced resource does not exist.
    ///
    /// Skipped when dependency verification is disabled.
    async fn ensure_exists(
        &self,
        kind: ResourceKind,
        name: &str,
        required_by: (ResourceKind, &str),
    ) -> Result<(), ManagementError> {
        Self::validate_name(kind, name)?;
        if !self.config.verify_dependencies {
            return Ok(());
        }

        if !self.provider.resource_exists(kind, name).await? {
            return Err(ManagementError::dependency_missing(
                kind,
                name,
                format!("{} '{}'", required_by.0, required_by.1),
            ));
        }
        Ok(())
    }

    /// Verify the resources `kind` depends on.
    ///
    /// Walks `kind.dependencies()` and looks each one up in `references`.
    /// Optional references without a name are skipped.
    async fn ensure_dependencies(
        &self,
        kind: ResourceKind,
        name: &str,
        references: &[(ResourceKind, Option<&str>)],
    ) -> Result<(), ManagementError> {
        for dependency in kind.dependencies() {
            let referenced = references
                .iter()
                .find(|(k, _)| k == dependency)
                .and_then(|(_, n)| *n);

            if let Some(referenced) = referenced {
                self.ensure_exists(*dependency, referenced, (kind, name))
                    .await?;
            }
        }
        Ok(())
    }

    /// Create or replace a data source.
    ///
    /// # Arguments
    ///
    /// * `definition` - Store kind, credentials and container of the data source
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the data source was created or updated
    /// * `Err(ManagementError::ApiRejected)` - If the credentials or store kind are rejected
    pub async fn create_or_update_data_source(
        &self,
        definition: &DataSourceDefinition,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::DataSource, &definition.name)?;

        info!(
            "Creating '{}' {} data source...",
            definition.name, definition.kind
        );
        self.provider.create_or_update_data_source(definition).await
    }

    /// Create or replace a synonym map from a JSON template.
    ///
    /// The template's `[SynonymMapName]` placeholder receives `name`.
    pub async fn create_synonym_map_from_template(
        &self,
        name: &str,
        template_path: &Path,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::SynonymMap, name)?;

        info!(
            "Creating '{}' synonym map with '{}'...",
            name,
            template_path.display()
        );
        let parameters = TemplateParameters::new().with(Placeholder::SynonymMapName, name);
        let body = template::render_file(template_path, &parameters).await?;

        self.provider
            .put_resource(ResourceKind::SynonymMap, name, body)
            .await
    }

    /// Create or replace an index from a JSON template.
    ///
    /// `[IndexName]` receives `name` and `[SynonymMapName]` receives the
    /// synonym map name when one is given. A referenced synonym map must
    /// already exist.
    pub async fn create_index_from_template(
        &self,
        name: &str,
        template_path: &Path,
        synonym_map_name: Option<&str>,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::Index, name)?;

        info!(
            "Creating '{}' index with '{}'...",
            name,
            template_path.display()
        );
        self.ensure_dependencies(
            ResourceKind::Index,
            name,
            &[(ResourceKind::SynonymMap, synonym_map_name)],
        )
        .await?;

        let parameters = TemplateParameters::new()
            .with(Placeholder::IndexName, name)
            .with_optional(Placeholder::SynonymMapName, synonym_map_name);
        let body = template::render_file(template_path, &parameters).await?;

        self.provider
            .put_resource(ResourceKind::Index, name, body)
            .await
    }

    /// Create or replace a skillset from a JSON template.
    ///
    /// The enrichment account, key, custom skill URI and custom skill key are
    /// substituted into their placeholders.
    pub async fn create_skillset_from_template(
        &self,
        name: &str,
        template_path: &Path,
        parameters: &SkillsetParameters,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::Skillset, name)?;

        info!(
            "Creating '{}' skillset with '{}'...",
            name,
            template_path.display()
        );
        let parameters = TemplateParameters::new()
            .with(
                Placeholder::CognitiveServicesAccount,
                &parameters.cognitive_services_account,
            )
            .with(
                Placeholder::CognitiveServicesKey,
                &parameters.cognitive_services_key,
            )
            .with(Placeholder::CustomSkillUri, &parameters.custom_skill_uri)
            .with(
                Placeholder::CustomSkillApiKey,
                &parameters.custom_skill_api_key,
            );
        let body = template::render_file(template_path, &parameters).await?;

        self.provider
            .put_resource(ResourceKind::Skillset, name, body)
            .await
    }

    /// Create or replace an indexer from a JSON template.
    ///
    /// The referenced data source, index and skillset must already exist.
    /// Creating the indexer also schedules its first run.
    pub async fn create_indexer_from_template(
        &self,
        name: &str,
        template_path: &Path,
        data_source_name: &str,
        index_name: &str,
        skillset_name: &str,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::Indexer, name)?;

        info!(
            "Creating '{}' indexer with '{}'...",
            name,
            template_path.display()
        );
        self.ensure_dependencies(
            ResourceKind::Indexer,
            name,
            &[
                (ResourceKind::DataSource, Some(data_source_name)),
                (ResourceKind::Index, Some(index_name)),
                (ResourceKind::Skillset, Some(skillset_name)),
            ],
        )
        .await?;

        let parameters = TemplateParameters::new()
            .with(Placeholder::IndexerName, name)
            .with(Placeholder::DataSourceName, data_source_name)
            .with(Placeholder::IndexName, index_name)
            .with(Placeholder::SkillsetName, skillset_name);
        let body = template::render_file(template_path, &parameters).await?;

        self.provider
            .put_resource(ResourceKind::Indexer, name, body)
            .await
    }

    /// Create or replace a plain indexer without a skillset or template.
    pub async fn create_indexer(
        &self,
        name: &str,
        data_source_name: &str,
        index_name: &str,
    ) -> Result<(), ManagementError> {
        Self::validate_name(ResourceKind::Indexer, name)?;

        info!("Creating '{}' indexer...", name);
        self.ensure_dependencies(
            ResourceKind::Indexer,
            name,
            &[
                (ResourceKind::DataSource, Some(data_source_name)),
                (ResourceKind::Index, Some(index_name)),
                (ResourceKind::Skillset, None),
            ],
        )
        .await?;

        let definition = IndexerDefinition::new(name, data_source_name, index_name);
        self.provider.create_or_update_indexer(&definition).await
    }

    /// Fetch the execution snapshot of an indexer.
    pub async fn get_indexer_status(
        &self,
        name: &str,
    ) -> Result<IndexerExecutionInfo, ManagementError> {
        Self::validate_name(ResourceKind::Indexer, name)?;
        self.provider.get_indexer_status(name).await
    }

    /// Delete a resource of any kind.
    ///
    /// A resource that is already absent yields `DeleteOutcome::NotFound`;
    /// other rejections are returned as errors.
    pub async fn delete(
        &self,
        kind: ResourceKind,
        name: &str,
    ) -> Result<DeleteOutcome, ManagementError> {
        Self::validate_name(kind, name)?;

        info!("Deleting '{}' {}...", name, kind);
        let outcome = self.provider.delete_resource(kind, name).await?;
        info!("Deleting '{}' {} results: {}", name, kind, outcome);

        Ok(outcome)
    }

    /// Delete a data source.
    pub async fn delete_data_source(&self, name: &str) -> Result<DeleteOutcome, ManagementError> {
        self.delete(ResourceKind::DataSource, name).await
    }

    /// Delete an index.
    pub async fn delete_index(&self, name: &str) -> Result<DeleteOutcome, ManagementError> {
        self.delete(ResourceKind::Index, name).await
    }

    /// Delete a skillset.
    pub async fn delete_skillset(&self, name: &str) -> Result<DeleteOutcome, ManagementError> {
        self.delete(ResourceKind::Skillset, name).await
    }

    /// Delete an indexer.
    pub async fn delete_indexer(&self, name: &str) -> Result<DeleteOutcome, ManagementError> {
        self.delete(ResourceKind::Indexer, name).await
    }

    /// Delete a synonym map.
    pub async fn delete_synonym_map(&self, name: &str) -> Result<DeleteOutcome, ManagementError> {
        self.delete(ResourceKind::SynonymMap, name).await
    }
}
