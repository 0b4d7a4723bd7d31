//! Role membership sources
//!
//! The authorization gate asks a [`RoleStore`] for each identity's roles on
//! every submission. Nothing here caches decisions, since membership can
//! change between calls.

pub mod memory;

pub use memory::MemoryRoleStore;

use async_trait::async_trait;
use modification_core::{PrincipalIdentity, RoleSet};
use std::fmt::Debug;

/// Error type for role lookups
#[derive(Debug, thiserror::Error)]
pub enum RoleStoreError {
    #[error("Role store lock poisoned")]
    Poisoned,

    #[error("Role backend error: {0}")]
    Backend(String),
}

/// Source of role membership for resolved identities
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait RoleStore: Send + Sync + Debug {
    /// Roles currently held by an identity
    ///
    /// An identity with no grants yields an empty set, not an error.
    async fn roles_for(&self, identity: &PrincipalIdentity) -> Result<RoleSet, RoleStoreError>;
}
