//! Provisioner settings read from environment variables.

use std::env;
use std::time::Duration;
use tracing::warn;

use crate::errors::ProvisioningError;
use crate::monitor::{MonitorConfig, DEFAULT_MAX_ATTEMPTS};
use crate::orchestrator::{
    IndexerPlan, ProvisioningPlan, RunMode, SkillsetPlan, TemplatedResource,
};
use search_provisioner_repository::config::DEFAULT_API_VERSION;
use search_provisioner_repository::{
    ResourceServiceConfig, SearchServiceConfig, SkillsetParameters,
};
use search_provisioner_shared::DataSourceDefinition;

/// Default run mode.
const DEFAULT_RUN_MODE: RunMode = RunMode::Recreate;

/// Default poll interval in seconds.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Default data source kind.
const DEFAULT_DATA_SOURCE_KIND: &str = "blob";

/// Everything a provisioner run needs.
#[derive(Debug, Clone)]
pub struct ProvisionerSettings {
    pub service: SearchServiceConfig,
    pub mode: RunMode,
    pub monitor: MonitorConfig,
    pub resources: ResourceServiceConfig,
    pub plan: ProvisioningPlan,
}

impl ProvisionerSettings {
    /// Read the settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `SEARCH_SERVICE_NAME`: Search service name, builds the service URL
    /// - `SEARCH_SERVICE_URL`: Explicit service URL, takes precedence over the name
    /// - `SEARCH_ADMIN_KEY`: Admin API key (required)
    /// - `SEARCH_API_VERSION`: Management API version (default: 2019-05-06-Preview)
    /// - `PROVISIONER_MODE`: provision, teardown, recreate or wait (default: recreate)
    /// - `INDEXER_POLL_INTERVAL_SECS`: Delay between status requests (default: 60)
    /// - `INDEXER_MAX_POLL_ATTEMPTS`: Status requests before giving up (default: 120)
    /// - `VERIFY_DEPENDENCIES`: Check referenced resources before creation (default: true)
    /// - `DATA_SOURCE_NAME`, `DATA_SOURCE_KIND`: Data source name and kind, blob or cosmosdb (default: blob)
    /// - `STORAGE_ACCOUNT_NAME`, `STORAGE_ACCOUNT_KEY`, `STORAGE_CONTAINER_NAME`: Blob data source
    /// - `STORAGE_CONTAINER_QUERY`: Optional virtual directory inside the blob container
    /// - `COSMOSDB_CONNECTION_STRING`, `COSMOSDB_DATABASE`, `COSMOSDB_CONTAINER`: Document store data source
    /// - `COSMOSDB_TRACK_CHANGES`: Attach a high-water-mark policy (default: true)
    /// - `SYNONYM_MAP_NAME`, `SYNONYM_MAP_TEMPLATE`: Optional synonym map
    /// - `INDEX_NAME`, `INDEX_TEMPLATE`: Index (required)
    /// - `SKILLSET_NAME`, `SKILLSET_TEMPLATE`: Optional skillset
    /// - `COGNITIVE_SERVICES_ACCOUNT`, `COGNITIVE_SERVICES_KEY`: Enrichment account, required with a skillset
    /// - `CUSTOM_SKILL_URI`, `CUSTOM_SKILL_API_KEY`: Custom enrichment endpoint, required with a skillset
    /// - `INDEXER_NAME`: Indexer name (required)
    /// - `INDEXER_TEMPLATE`: Optional indexer template, requires a skillset
    pub fn from_env() -> Result<Self, ProvisioningError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProvisioningError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let service = Self::service_config(&vars)?;

        let mode = match vars.get("PROVISIONER_MODE") {
            Some(mode) => mode.parse()?,
            None => DEFAULT_RUN_MODE,
        };

        let monitor = MonitorConfig {
            poll_interval: Duration::from_secs(
                vars.parse("INDEXER_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS),
            ),
            max_attempts: vars.parse("INDEXER_MAX_POLL_ATTEMPTS", DEFAULT_MAX_ATTEMPTS),
        };
        if monitor.max_attempts == 0 {
            return Err(ProvisioningError::config(
                "INDEXER_MAX_POLL_ATTEMPTS must be at least 1",
            ));
        }

        let resources = ResourceServiceConfig {
            verify_dependencies: vars.flag("VERIFY_DEPENDENCIES", true),
        };

        let plan = Self::plan(&vars)?;
        plan.validate()?;

        Ok(Self {
            service,
            mode,
            monitor,
            resources,
            plan,
        })
    }

    fn service_config<F>(vars: &Vars<F>) -> Result<SearchServiceConfig, ProvisioningError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = vars.require("SEARCH_ADMIN_KEY")?;
        let api_version = vars
            .get("SEARCH_API_VERSION")
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let config = match (vars.get("SEARCH_SERVICE_URL"), vars.get("SEARCH_SERVICE_NAME")) {
            (Some(url), _) => SearchServiceConfig::new(&url, api_key),
            (None, Some(name)) => SearchServiceConfig::for_service_name(&name, api_key),
            (None, None) => {
                return Err(ProvisioningError::config(
                    "SEARCH_SERVICE_NAME or SEARCH_SERVICE_URL must be set",
                ))
            }
        }?;

        Ok(config.with_api_version(api_version))
    }

    fn plan<F>(vars: &Vars<F>) -> Result<ProvisioningPlan, ProvisioningError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_source = Self::data_source(vars)?;
        let synonym_map = vars.templated("SYNONYM_MAP_NAME", "SYNONYM_MAP_TEMPLATE")?;
        let index = TemplatedResource::new(
            vars.require("INDEX_NAME")?,
            vars.require("INDEX_TEMPLATE")?,
        );

        let skillset = match vars.templated("SKILLSET_NAME", "SKILLSET_TEMPLATE")? {
            Some(resource) => Some(SkillsetPlan {
                resource,
                parameters: SkillsetParameters {
                    cognitive_services_account: vars.require("COGNITIVE_SERVICES_ACCOUNT")?,
                    cognitive_services_key: vars.require("COGNITIVE_SERVICES_KEY")?,
                    custom_skill_uri: vars.require("CUSTOM_SKILL_URI")?,
                    custom_skill_api_key: vars.require("CUSTOM_SKILL_API_KEY")?,
                },
            }),
            None => None,
        };

        let indexer_name = vars.require("INDEXER_NAME")?;
        let indexer = match vars.get("INDEXER_TEMPLATE") {
            Some(template) => IndexerPlan::Templated(TemplatedResource::new(indexer_name, template)),
            None => IndexerPlan::Simple { name: indexer_name },
        };

        Ok(ProvisioningPlan {
            data_source,
            synonym_map,
            index,
            skillset,
            indexer,
        })
    }

    fn data_source<F>(vars: &Vars<F>) -> Result<DataSourceDefinition, ProvisioningError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let name = vars.require("DATA_SOURCE_NAME")?;
        let kind = vars
            .get("DATA_SOURCE_KIND")
            .unwrap_or_else(|| DEFAULT_DATA_SOURCE_KIND.to_string());

        match kind.to_lowercase().as_str() {
            "blob" | "azureblob" => {
                let definition = DataSourceDefinition::blob(
                    name,
                    &vars.require("STORAGE_ACCOUNT_NAME")?,
                    &vars.require("STORAGE_ACCOUNT_KEY")?,
                    vars.require("STORAGE_CONTAINER_NAME")?,
                );
                Ok(match vars.get("STORAGE_CONTAINER_QUERY") {
                    Some(query) => definition.with_container_query(query),
                    None => definition,
                })
            }
            "cosmosdb" | "documentdb" => Ok(DataSourceDefinition::document_store(
                name,
                &vars.require("COSMOSDB_CONNECTION_STRING")?,
                &vars.require("COSMOSDB_DATABASE")?,
                vars.require("COSMOSDB_CONTAINER")?,
                vars.flag("COSMOSDB_TRACK_CHANGES", true),
            )),
            other => Err(ProvisioningError::config(format!(
                "Invalid DATA_SOURCE_KIND '{}', expected blob or cosmosdb",
                other
            ))),
        }
    }
}

/// Variable lookup treating blank values as unset.
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &str) -> Result<String, ProvisioningError> {
        self.get(key)
            .ok_or_else(|| ProvisioningError::config(format!("{} must be set", key)))
    }

    fn parse<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get(key) {
            Some(value) => value.parse().unwrap_or_else(|_| {
                warn!(variable = key, value = %value, "Invalid value, using default");
                default
            }),
            None => default,
        }
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key).map(|v| v.to_lowercase()) {
            Some(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
            Some(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
            Some(v) => {
                warn!(variable = key, value = %v, "Invalid flag, using default");
                default
            }
            None => default,
        }
    }

    /// A resource configured by a name and a template variable; both or neither.
    fn templated(
        &self,
        name_key: &str,
        template_key: &str,
    ) -> Result<Option<TemplatedResource>, ProvisioningError> {
        match (self.get(name_key), self.get(template_key)) {
            (Some(name), Some(template)) => Ok(Some(TemplatedResource::new(name, template))),
            (None, None) => Ok(None),
            _ => Err(ProvisioningError::config(format!(
                "{} and {} must be set together",
                name_key, template_key
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_provisioner_shared::{ChangeDetectionPolicy, DataSourceKind};
    use std::collections::HashMap;

    fn base() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SEARCH_SERVICE_NAME", "my-search"),
            ("SEARCH_ADMIN_KEY", "admin-key"),
            ("DATA_SOURCE_NAME", "docs"),
            ("STORAGE_ACCOUNT_NAME", "account"),
            ("STORAGE_ACCOUNT_KEY", "secret"),
            ("STORAGE_CONTAINER_NAME", "files"),
            ("INDEX_NAME", "docs-index"),
            ("INDEX_TEMPLATE", "templates/index.json"),
            ("INDEXER_NAME", "docs-indexer"),
        ])
    }

    fn settings(vars: &HashMap<&'static str, &'static str>) -> Result<ProvisionerSettings, ProvisioningError> {
        ProvisionerSettings::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let settings = settings(&base()).unwrap();

        assert_eq!(
            settings.service.service_url.as_str(),
            "https://my-search.search.windows.net/"
        );
        assert_eq!(settings.service.api_version, "2019-05-06-Preview");
        assert_eq!(settings.mode, RunMode::Recreate);
        assert_eq!(settings.monitor.poll_interval, Duration::from_secs(60));
        assert_eq!(settings.monitor.max_attempts, 120);
        assert!(settings.resources.verify_dependencies);
        assert_eq!(settings.plan.data_source.kind, DataSourceKind::Blob);
        assert_eq!(settings.plan.data_source.container.query, None);
        assert!(settings.plan.synonym_map.is_none());
        assert!(settings.plan.skillset.is_none());
        assert!(matches!(settings.plan.indexer, IndexerPlan::Simple { .. }));
    }

    #[test]
    fn test_full_plan() {
        let mut vars = base();
        vars.extend([
            ("SEARCH_SERVICE_URL", "http://localhost:8080"),
            ("SEARCH_API_VERSION", "2020-06-30"),
            ("PROVISIONER_MODE", "provision"),
            ("INDEXER_POLL_INTERVAL_SECS", "5"),
            ("INDEXER_MAX_POLL_ATTEMPTS", "10"),
            ("VERIFY_DEPENDENCIES", "false"),
            ("DATA_SOURCE_KIND", "cosmosdb"),
            ("COSMOSDB_CONNECTION_STRING", "AccountEndpoint=https://db.documents.azure.com;AccountKey=k;"),
            ("COSMOSDB_DATABASE", "store"),
            ("COSMOSDB_CONTAINER", "items"),
            ("SYNONYM_MAP_NAME", "syn1"),
            ("SYNONYM_MAP_TEMPLATE", "templates/synonyms.json"),
            ("SKILLSET_NAME", "enrich"),
            ("SKILLSET_TEMPLATE", "templates/skillset.json"),
            ("COGNITIVE_SERVICES_ACCOUNT", "cog"),
            ("COGNITIVE_SERVICES_KEY", "cog-key"),
            ("CUSTOM_SKILL_URI", "https://skills.example.com/api"),
            ("CUSTOM_SKILL_API_KEY", "skill-key"),
            ("INDEXER_TEMPLATE", "templates/indexer.json"),
        ]);

        let settings = settings(&vars).unwrap();

        assert_eq!(settings.service.service_url.as_str(), "http://localhost:8080/");
        assert_eq!(settings.service.api_version, "2020-06-30");
        assert_eq!(settings.mode, RunMode::Provision);
        assert_eq!(settings.monitor.poll_interval, Duration::from_secs(5));
        assert_eq!(settings.monitor.max_attempts, 10);
        assert!(!settings.resources.verify_dependencies);

        let plan = &settings.plan;
        assert_eq!(plan.data_source.kind, DataSourceKind::DocumentStore);
        assert_eq!(
            plan.data_source.data_change_detection_policy,
            Some(ChangeDetectionPolicy::HighWaterMark {
                column: "_ts".to_string()
            })
        );
        assert_eq!(plan.synonym_map.as_ref().unwrap().name, "syn1");
        assert_eq!(
            plan.skillset.as_ref().unwrap().parameters.custom_skill_uri,
            "https://skills.example.com/api"
        );
        assert!(matches!(plan.indexer, IndexerPlan::Templated(_)));
    }

    #[test]
    fn test_blob_container_query() {
        let mut vars = base();
        vars.insert("STORAGE_CONTAINER_QUERY", "reports/2024");

        let scoped = settings(&vars).unwrap();
        let container = &scoped.plan.data_source.container;
        assert_eq!(container.name, "files");
        assert_eq!(container.query.as_deref(), Some("reports/2024"));

        vars.insert("STORAGE_CONTAINER_QUERY", "  ");
        let blank = settings(&vars).unwrap();
        assert_eq!(blank.plan.data_source.container.query, None);
    }

    #[test]
    fn test_missing_required_variables() {
        let mut vars = base();
        vars.remove("SEARCH_ADMIN_KEY");
        let err = settings(&vars).unwrap_err();
        assert!(err.to_string().contains("SEARCH_ADMIN_KEY"));

        let mut vars = base();
        vars.remove("SEARCH_SERVICE_NAME");
        assert!(matches!(
            settings(&vars),
            Err(ProvisioningError::ConfigError(_))
        ));

        let mut vars = base();
        vars.insert("INDEX_NAME", "  ");
        let err = settings(&vars).unwrap_err();
        assert!(err.to_string().contains("INDEX_NAME"));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = base();
        vars.insert("SEARCH_SERVICE_URL", "not a url");
        assert!(matches!(
            settings(&vars),
            Err(ProvisioningError::ManagementError(_))
        ));

        let mut vars = base();
        vars.insert("PROVISIONER_MODE", "deploy");
        assert!(matches!(
            settings(&vars),
            Err(ProvisioningError::ConfigError(_))
        ));

        let mut vars = base();
        vars.insert("DATA_SOURCE_KIND", "sql");
        assert!(settings(&vars).is_err());

        let mut vars = base();
        vars.insert("INDEXER_MAX_POLL_ATTEMPTS", "0");
        assert!(settings(&vars).is_err());

        let mut vars = base();
        vars.insert("INDEXER_POLL_INTERVAL_SECS", "soon");
        assert_eq!(
            settings(&vars).unwrap().monitor.poll_interval,
            Duration::from_secs(60)
        );
    }

    #[test]
    fn test_incomplete_optional_resources() {
        let mut vars = base();
        vars.insert("SYNONYM_MAP_NAME", "syn1");
        let err = settings(&vars).unwrap_err();
        assert!(err.to_string().contains("SYNONYM_MAP_TEMPLATE"));

        let mut vars = base();
        vars.insert("SKILLSET_NAME", "enrich");
        vars.insert("SKILLSET_TEMPLATE", "skillset.json");
        let err = settings(&vars).unwrap_err();
        assert!(err.to_string().contains("COGNITIVE_SERVICES_ACCOUNT"));

        let mut vars = base();
        vars.insert("INDEXER_TEMPLATE", "indexer.json");
        assert!(matches!(
            settings(&vars),
            Err(ProvisioningError::ConfigError(_))
        ));
    }
}
