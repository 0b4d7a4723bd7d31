//! Authorization Gate
//!
//! Fetches the current roles of every identity in the resolved chain and
//! applies the union policy from `modification_core::authorization`. Roles
//! are fetched fresh for each submission.
//!
//! Failures are reported to the caller as a bare `Unauthorized`. The missing
//! roles are logged server-side only.

use modification_core::{is_authorized, missing_roles, ResolvedPrincipalSet, RoleSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::SubmissionError;
use crate::roles::RoleStore;

/// Decides whether a principal chain may run a configuration
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    store: Arc<dyn RoleStore>,
}

impl AuthorizationGate {
    pub fn new(store: Arc<dyn RoleStore>) -> Self {
        Self { store }
    }

    /// Check the chain against a configuration's required roles
    ///
    /// A role store failure denies the submission.
    pub async fn authorize(
        &self,
        principals: &ResolvedPrincipalSet,
        required: &RoleSet,
    ) -> Result<(), SubmissionError> {
        let mut held = Vec::with_capacity(principals.len());
        for identity in principals {
            match self.store.roles_for(identity).await {
                Ok(roles) => held.push(roles),
                Err(e) => {
                    warn!(
                        principal = %identity,
                        error = %e,
                        "SECURITY: Role lookup failed, denying submission"
                    );
                    return Err(SubmissionError::Unauthorized);
                }
            }
        }

        if is_authorized(&held, required) {
            debug!(principals = %principals, required = ?required, "Authorization granted");
            return Ok(());
        }

        warn!(
            principals = %principals,
            required = ?required,
            missing = ?missing_roles(&held, required),
            "SECURITY: Principal chain lacks required roles"
        );

        Err(SubmissionError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{MemoryRoleStore, RoleStoreError};
    use async_trait::async_trait;
    use modification_core::{resolve, PrincipalIdentity, ProxyChain};

    fn roles(names: &[&str]) -> RoleSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Debug)]
    struct FailingStore;

    #[async_trait]
    impl RoleStore for FailingStore {
        async fn roles_for(
            &self,
            _identity: &PrincipalIdentity,
        ) -> Result<RoleSet, RoleStoreError> {
            Err(RoleStoreError::Backend("directory unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_proxy_and_user_roles_combine() {
        let store = MemoryRoleStore::new()
            .with_grant("cn=gateway", "cn=ca1", ["PROXY"])
            .unwrap()
            .with_grant("cn=alice", "cn=ca2", ["ADMIN"])
            .unwrap();
        let gate = AuthorizationGate::new(Arc::new(store));

        let principals = resolve(
            &ProxyChain::single("cn=gateway", "cn=ca1").with("cn=alice", "cn=ca2"),
        )
        .unwrap();

        assert!(gate
            .authorize(&principals, &roles(&["PROXY", "ADMIN"]))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_missing_role_is_unauthorized() {
        let store = MemoryRoleStore::new()
            .with_grant("alice", "CA1", ["USER"])
            .unwrap();
        let gate = AuthorizationGate::new(Arc::new(store));
        let principals = resolve(&ProxyChain::single("alice", "CA1")).unwrap();

        let result = gate.authorize(&principals, &roles(&["ADMIN"])).await;
        assert!(matches!(result, Err(SubmissionError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_store_failure_denies() {
        let gate = AuthorizationGate::new(Arc::new(FailingStore));
        let principals = resolve(&ProxyChain::single("alice", "CA1")).unwrap();

        let result = gate.authorize(&principals, &roles(&["ADMIN"])).await;
        assert!(matches!(result, Err(SubmissionError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_membership_change_between_calls() {
        let store = Arc::new(
            MemoryRoleStore::new()
                .with_grant("alice", "CA1", ["ADMIN"])
                .unwrap(),
        );
        let gate = AuthorizationGate::new(store.clone());
        let principals = resolve(&ProxyChain::single("alice", "CA1")).unwrap();
        let required = roles(&["ADMIN"]);

        assert!(gate.authorize(&principals, &required).await.is_ok());

        store.revoke("alice", "CA1", "ADMIN").unwrap();

        assert!(gate.authorize(&principals, &required).await.is_err());
    }
}
