//! Startup configuration
//!
//! Loads the service definition file that populates the registry and seeds
//! role grants. Example:
//!
//! ```json
//! {
//!   "configurations": [
//!     {
//!       "name": "purge",
//!       "request_variant": "PurgeRequest",
//!       "required_roles": ["ADMIN"],
//!       "job": "log",
//!       "description": "Remove rows from a shard"
//!     }
//!   ],
//!   "principals": [
//!     { "subject": "cn=alice", "issuer": "cn=ca1", "roles": ["ADMIN"] }
//!   ]
//! }
//! ```
//!
//! Any problem here is fatal at startup; nothing is surfaced to callers.

use modification_core::{RequestVariant, RoleSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::job::ModificationJob;
use crate::jobs::LogJob;
use crate::registry::{
    ConfigurationRegistry, ModificationConfiguration, RegistryBuilder, RegistryError,
};
use crate::roles::{MemoryRoleStore, RoleStoreError};

/// Errors loading the service definition
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration '{configuration}' references unknown job '{job}'")]
    UnknownJob { configuration: String, job: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to seed role store: {0}")]
    Roles(#[from] RoleStoreError),
}

/// One configuration entry in the definition file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationEntry {
    pub name: String,

    pub request_variant: RequestVariant,

    #[serde(default)]
    pub required_roles: RoleSet,

    /// Name of the job in the [`JobCatalog`]
    pub job: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Roles granted to one (subject, issuer) identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrincipalGrant {
    pub subject: String,
    pub issuer: String,
    #[serde(default)]
    pub roles: RoleSet,
}

/// Top-level service definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Configurations in registration order
    #[serde(default)]
    pub configurations: Vec<ConfigurationEntry>,

    #[serde(default)]
    pub principals: Vec<PrincipalGrant>,
}

impl ServiceConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Build the registry, resolving job names against a catalog
    pub fn build_registry(
        &self,
        catalog: &JobCatalog,
    ) -> Result<ConfigurationRegistry, ConfigError> {
        let mut builder = RegistryBuilder::new();

        for entry in &self.configurations {
            let job = catalog.get(&entry.job).ok_or_else(|| ConfigError::UnknownJob {
                configuration: entry.name.clone(),
                job: entry.job.clone(),
            })?;

            let mut configuration = ModificationConfiguration::new(
                entry.name.clone(),
                entry.request_variant.clone(),
                job,
            )
            .with_required_roles(entry.required_roles.iter().cloned());
            if let Some(description) = &entry.description {
                configuration = configuration.with_description(description.clone());
            }
            builder.register(configuration);
        }

        let registry = builder.build()?;
        info!(count = registry.len(), "Configuration registry loaded");
        Ok(registry)
    }

    /// Build an in-memory role store seeded with the principal grants
    pub fn build_role_store(&self) -> Result<MemoryRoleStore, ConfigError> {
        let store = MemoryRoleStore::new();
        for grant in &self.principals {
            store.grant(&grant.subject, &grant.issuer, grant.roles.iter().cloned())?;
        }
        Ok(store)
    }
}

/// Jobs available to configuration entries, by name
#[derive(Clone, Default)]
pub struct JobCatalog {
    jobs: HashMap<String, Arc<dyn ModificationJob>>,
}

impl JobCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding the built-in jobs
    pub fn builtin() -> Self {
        Self::new().with_job(LogJob::NAME, Arc::new(LogJob::new()))
    }

    /// Add a job (builder pattern)
    pub fn with_job(mut self, name: impl Into<String>, job: Arc<dyn ModificationJob>) -> Self {
        self.register(name, job);
        self
    }

    /// Add a job, replacing any job already under that name
    pub fn register(&mut self, name: impl Into<String>, job: Arc<dyn ModificationJob>) {
        self.jobs.insert(name.into(), job);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ModificationJob>> {
        self.jobs.get(name).cloned()
    }

    /// Registered job names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.jobs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for JobCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobCatalog")
            .field("jobs", &self.names())
            .finish()
    }
}
