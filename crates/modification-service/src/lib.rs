//! # Modification Service
//!
//! Runs named, pre-configured modification jobs on behalf of a proxied
//! caller. A submission moves through five stages and stops at the first
//! failure:
//!
//! 1. **Resolve** the proxy chain into an ordered principal set
//! 2. **Look up** the named configuration in the registry
//! 3. **Validate** the request variant against the configuration
//! 4. **Authorize** the principal set against the required roles
//! 5. **Dispatch** the request to the configuration's job
//!
//! The registry is built once at startup and is read-only afterwards, so a
//! [`ModificationService`] can be shared across tasks without locking. Role
//! membership is fetched from a [`RoleStore`] on every submission.
//!
//! ## Outcomes
//!
//! | Failure          | Code              | Status |
//! |------------------|-------------------|--------|
//! | `MalformedChain` | `MALFORMED_CHAIN` | 400    |
//! | `NotFound`       | `NOT_FOUND`       | 400    |
//! | `TypeMismatch`   | `TYPE_MISMATCH`   | 400    |
//! | `Unauthorized`   | `UNAUTHORIZED`    | 401    |
//! | `ExecutionError` | `EXECUTION_ERROR` | 500    |

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod job;
pub mod jobs;
pub mod registry;
pub mod roles;
pub mod service;
pub mod validation;

pub use config::{ConfigError, JobCatalog, ServiceConfig};
pub use dispatch::Dispatcher;
pub use error::{ErrorResponse, SubmissionError};
pub use gate::AuthorizationGate;
pub use job::{JobError, ModificationJob};
pub use registry::{
    ConfigurationRegistry, ConfigurationSummary, ModificationConfiguration, RegistryBuilder,
    RegistryError,
};
pub use roles::{MemoryRoleStore, RoleStore, RoleStoreError};
pub use service::{ModificationService, SubmissionReceipt, SubmissionResult};
