//! The executable unit bound to a modification configuration

use async_trait::async_trait;
use modification_core::{CoreError, ModificationRequest, ResolvedPrincipalSet};
use thiserror::Error;

/// A modification job
///
/// Jobs own their data-layer effects, including any retry or rollback. The
/// dispatcher runs each invocation exactly once and never retries.
#[async_trait]
pub trait ModificationJob: Send + Sync {
    /// Run the job for one validated, authorized request
    ///
    /// # Arguments
    /// * `request` - Request whose variant matches the configuration
    /// * `principals` - Acting principal chain, frontline caller first
    async fn execute(
        &self,
        request: ModificationRequest,
        principals: ResolvedPrincipalSet,
    ) -> Result<(), JobError>;

    /// Get a description of this job (for logging)
    fn description(&self) -> &str {
        "modification job"
    }
}

/// Errors raised while a job executes
#[derive(Error, Debug)]
pub enum JobError {
    /// Job reported a failure
    #[error("job failed: {0}")]
    Failed(String),

    /// Job could not decode the request fields
    #[error("invalid request payload: {0}")]
    InvalidPayload(#[from] CoreError),

    /// Job panicked; the payload message is kept when it was a string
    #[error("job panicked: {0}")]
    Panicked(String),

    /// Job task ended without producing a result
    #[error("job aborted before completion")]
    Aborted,

    /// Any other error from the job's own stack
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl JobError {
    pub fn failed(message: impl Into<String>) -> Self {
        JobError::Failed(message.into())
    }

    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        JobError::Other(Box::new(err))
    }
}
