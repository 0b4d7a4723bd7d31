//! Configuration Registry
//!
//! Holds the named modification configurations. The registry is assembled
//! once through [`RegistryBuilder`] and exposes no mutation afterwards, so it
//! can be shared between concurrent submissions without a lock.

use modification_core::{RequestVariant, RoleSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::job::ModificationJob;

/// Errors assembling a registry at startup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate modification configuration name: {0}")]
    DuplicateName(String),

    #[error("Modification configuration name cannot be empty")]
    EmptyName,
}

/// A named binding of request variant, required roles and job
#[derive(Clone)]
pub struct ModificationConfiguration {
    name: String,
    request_variant: RequestVariant,
    required_roles: RoleSet,
    description: Option<String>,
    job: Arc<dyn ModificationJob>,
}

impl ModificationConfiguration {
    /// Create a configuration that requires no roles
    pub fn new(
        name: impl Into<String>,
        request_variant: impl Into<RequestVariant>,
        job: Arc<dyn ModificationJob>,
    ) -> Self {
        Self {
            name: name.into(),
            request_variant: request_variant.into(),
            required_roles: RoleSet::new(),
            description: None,
            job,
        }
    }

    /// Require a role (builder pattern)
    pub fn with_required_role(mut self, role: impl Into<String>) -> Self {
        self.required_roles.insert(role.into());
        self
    }

    /// Require several roles (builder pattern)
    pub fn with_required_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn request_variant(&self) -> &RequestVariant {
        &self.request_variant
    }

    pub fn required_roles(&self) -> &RoleSet {
        &self.required_roles
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn job(&self) -> &Arc<dyn ModificationJob> {
        &self.job
    }

    /// Listing view without the job reference
    pub fn summary(&self) -> ConfigurationSummary {
        ConfigurationSummary {
            name: self.name.clone(),
            request_variant: self.request_variant.clone(),
            required_roles: self.required_roles.clone(),
            description: self.description.clone(),
        }
    }
}

impl fmt::Debug for ModificationConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModificationConfiguration")
            .field("name", &self.name)
            .field("request_variant", &self.request_variant)
            .field("required_roles", &self.required_roles)
            .field("description", &self.description)
            .field("job", &self.job.description())
            .finish()
    }
}

/// Listing entry returned by `list_configurations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSummary {
    /// Service name used to submit
    pub name: String,

    /// Variant tag the request must carry
    pub request_variant: RequestVariant,

    /// Roles the acting principal chain must hold between them
    pub required_roles: RoleSet,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Immutable registry of modification configurations
#[derive(Debug, Default)]
pub struct ConfigurationRegistry {
    configurations: Vec<ModificationConfiguration>,
    index: HashMap<String, usize>,
}

impl ConfigurationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Create an empty registry
    pub fn empty() -> Self {
        Self::default()
    }

    /// All configurations in registration order
    pub fn list(&self) -> &[ModificationConfiguration] {
        &self.configurations
    }

    /// Find a configuration by exact, case-sensitive name
    pub fn lookup(&self, name: &str) -> Option<&ModificationConfiguration> {
        self.index.get(name).map(|&i| &self.configurations[i])
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Configuration names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name()).collect()
    }
}

/// Builder for creating a ConfigurationRegistry
#[derive(Default)]
pub struct RegistryBuilder {
    configurations: Vec<ModificationConfiguration>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration (builder pattern)
    pub fn with_configuration(mut self, configuration: ModificationConfiguration) -> Self {
        self.register(configuration);
        self
    }

    /// Add a configuration
    pub fn register(&mut self, configuration: ModificationConfiguration) {
        self.configurations.push(configuration);
    }

    /// Build the registry
    ///
    /// # Returns
    /// * `Err(RegistryError::DuplicateName)` if two configurations share a name
    /// * `Err(RegistryError::EmptyName)` if any name is blank
    pub fn build(self) -> Result<ConfigurationRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.configurations.len());

        for (i, configuration) in self.configurations.iter().enumerate() {
            if configuration.name.trim().is_empty() {
                return Err(RegistryError::EmptyName);
            }
            if index.insert(configuration.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateName(configuration.name.clone()));
            }
            info!(
                name = %configuration.name,
                request_variant = %configuration.request_variant,
                required_roles = ?configuration.required_roles,
                job = configuration.job.description(),
                "Registered modification configuration"
            );
        }

        Ok(ConfigurationRegistry {
            configurations: self.configurations,
            index,
        })
    }
}
