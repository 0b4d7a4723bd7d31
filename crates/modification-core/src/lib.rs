//! # Modification Core
//!
//! Transport-free building blocks for submitting named modification jobs on
//! behalf of a chain of proxied identities.
//!
//! ## Key Concepts
//!
//! - **Proxy chain**: the frontline caller followed by the identities it is
//!   acting for, each paired with the issuer that vouches for it
//! - **Resolved principal set**: the ordered, structurally verified form of a
//!   proxy chain
//! - **Request variant**: the discriminant a submitted payload carries,
//!   compared against what a configuration expects
//! - **Role policy**: the union of roles held across the whole chain must
//!   cover the roles a configuration requires
//!
//! Everything in this crate is a pure function of its inputs. Role lookups,
//! registries and job execution live in `modification-service`.

pub mod authorization;
pub mod chain;
pub mod error;
pub mod request;
pub mod types;

pub use authorization::{combined_roles, is_authorized, missing_roles};
pub use chain::resolve;
pub use error::{ChainError, ChainField, CoreError, Result};
pub use request::{ModificationRequest, RequestVariant, TypedRequest};
pub use types::{
    PrincipalIdentity, ProxiedIdentity, ProxyChain, ResolvedPrincipalSet, RoleSet,
    SubmissionStage,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
