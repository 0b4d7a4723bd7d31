//! In-memory role store
//!
//! Grants are keyed by the exact (subject, issuer) pair, so the same
//! subject vouched for by a different issuer holds no roles. Keys are
//! trimmed the same way chain resolution trims entries.

use async_trait::async_trait;
use modification_core::{PrincipalIdentity, RoleSet};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::info;

use super::{RoleStore, RoleStoreError};

type IdentityKey = (String, String);

/// In-memory role store implementation
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    grants: RwLock<HashMap<IdentityKey, RoleSet>>,
}

impl MemoryRoleStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add roles for an identity (builder pattern)
    pub fn with_grant<I, S>(
        self,
        subject_dn: &str,
        issuer_dn: &str,
        roles: I,
    ) -> Result<Self, RoleStoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grant(subject_dn, issuer_dn, roles)?;
        Ok(self)
    }

    /// Add roles for an identity, keeping any it already holds
    pub fn grant<I, S>(
        &self,
        subject_dn: &str,
        issuer_dn: &str,
        roles: I,
    ) -> Result<(), RoleStoreError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut grants = self.grants.write().map_err(|_| RoleStoreError::Poisoned)?;
        let held = grants.entry(key(subject_dn, issuer_dn)).or_default();
        held.extend(roles.into_iter().map(Into::into));
        info!(subject = %subject_dn, issuer = %issuer_dn, roles = ?held, "Granted roles");
        Ok(())
    }

    /// Remove one role from an identity
    pub fn revoke(
        &self,
        subject_dn: &str,
        issuer_dn: &str,
        role: &str,
    ) -> Result<bool, RoleStoreError> {
        let mut grants = self.grants.write().map_err(|_| RoleStoreError::Poisoned)?;
        let removed = grants
            .get_mut(&key(subject_dn, issuer_dn))
            .map(|held| held.remove(role))
            .unwrap_or(false);
        if removed {
            info!(subject = %subject_dn, issuer = %issuer_dn, role = %role, "Revoked role");
        }
        Ok(removed)
    }

    /// Number of identities with grants
    pub fn identity_count(&self) -> Result<usize, RoleStoreError> {
        let grants = self.grants.read().map_err(|_| RoleStoreError::Poisoned)?;
        Ok(grants.len())
    }
}

fn key(subject_dn: &str, issuer_dn: &str) -> IdentityKey {
    (subject_dn.trim().to_string(), issuer_dn.trim().to_string())
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn roles_for(&self, identity: &PrincipalIdentity) -> Result<RoleSet, RoleStoreError> {
        let grants = self.grants.read().map_err(|_| RoleStoreError::Poisoned)?;
        Ok(grants
            .get(&key(identity.subject_dn(), identity.issuer_dn()))
            .cloned()
            .unwrap_or_default())
    }
}
