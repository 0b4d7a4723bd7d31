//! Submission error taxonomy and caller-facing responses

use modification_core::{ChainError, RequestVariant, SubmissionStage};
use serde::Serialize;
use thiserror::Error;

use crate::job::JobError;

/// Why a submission did not succeed
///
/// Each variant is a distinct, externally observable outcome. `Unauthorized`
/// carries no detail and `ExecutionError` keeps its cause for logs only.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Malformed proxy chain: {0}")]
    MalformedChain(#[source] ChainError),

    #[error("Unknown modification service: {name}")]
    NotFound { name: String },

    #[error("Request type mismatch: expected '{expected}', got '{actual}'")]
    TypeMismatch {
        expected: RequestVariant,
        actual: RequestVariant,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Modification service '{service}' failed")]
    ExecutionError {
        service: String,
        #[source]
        source: JobError,
    },
}

impl SubmissionError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            SubmissionError::MalformedChain(_) => "MALFORMED_CHAIN",
            SubmissionError::NotFound { .. } => "NOT_FOUND",
            SubmissionError::TypeMismatch { .. } => "TYPE_MISMATCH",
            SubmissionError::Unauthorized => "UNAUTHORIZED",
            SubmissionError::ExecutionError { .. } => "EXECUTION_ERROR",
        }
    }

    /// HTTP-style status a transport should report
    pub fn status(&self) -> u16 {
        match self {
            SubmissionError::MalformedChain(_)
            | SubmissionError::NotFound { .. }
            | SubmissionError::TypeMismatch { .. } => 400,
            SubmissionError::Unauthorized => 401,
            SubmissionError::ExecutionError { .. } => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }

    /// The stage the submission could not enter
    pub fn stage(&self) -> SubmissionStage {
        match self {
            SubmissionError::MalformedChain(_) => SubmissionStage::Resolved,
            SubmissionError::NotFound { .. } => SubmissionStage::LookedUp,
            SubmissionError::TypeMismatch { .. } => SubmissionStage::TypeValidated,
            SubmissionError::Unauthorized => SubmissionStage::Authorized,
            SubmissionError::ExecutionError { .. } => SubmissionStage::Executed,
        }
    }

    /// Underlying job failure, for logging by the caller
    pub fn cause(&self) -> Option<&JobError> {
        match self {
            SubmissionError::ExecutionError { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Message safe to return across the trust boundary
    pub fn public_message(&self) -> String {
        match self {
            SubmissionError::Unauthorized => {
                "Caller is not authorized for this modification service".into()
            }
            SubmissionError::ExecutionError { service, .. } => {
                format!("Error running modification service '{}'", service)
            }
            other => other.to_string(),
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
            status: self.status(),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub status: u16,
}

impl From<ChainError> for SubmissionError {
    fn from(err: ChainError) -> Self {
        SubmissionError::MalformedChain(err)
    }
}
