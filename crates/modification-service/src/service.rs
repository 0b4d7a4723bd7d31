//! Modification service entry points
//!
//! `list_configurations` and `submit` are the two operations a transport
//! exposes. A submission walks
//! `Received -> Resolved -> LookedUp -> TypeValidated -> Authorized -> Executed`
//! and stops at the first stage that fails.

use modification_core::{resolve, ModificationRequest, ProxyChain, SubmissionStage};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::dispatch::Dispatcher;
use crate::error::SubmissionError;
use crate::gate::AuthorizationGate;
use crate::registry::{ConfigurationRegistry, ConfigurationSummary};
use crate::roles::RoleStore;
use crate::validation::validate_request_type;

/// Outcome of a submission
pub type SubmissionResult = Result<SubmissionReceipt, SubmissionError>;

/// Returned when a job completes normally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Correlates the audit log lines for this submission
    pub submission_id: Uuid,

    /// Server-side time spent on the submission, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_time_ms: Option<u64>,
}

/// Registry, authorization gate and dispatcher behind one facade
///
/// Holds no per-request state; share it behind an `Arc` and call `submit`
/// from as many tasks as needed.
#[derive(Debug)]
pub struct ModificationService {
    registry: ConfigurationRegistry,
    gate: AuthorizationGate,
    dispatcher: Dispatcher,
}

impl ModificationService {
    pub fn new(registry: ConfigurationRegistry, roles: Arc<dyn RoleStore>) -> Self {
        Self {
            registry,
            gate: AuthorizationGate::new(roles),
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn registry(&self) -> &ConfigurationRegistry {
        &self.registry
    }

    /// List the registered configurations in registration order
    pub fn list_configurations(&self) -> Vec<ConfigurationSummary> {
        self.registry.list().iter().map(|c| c.summary()).collect()
    }

    /// Submit a request to a named configuration
    ///
    /// # Arguments
    /// * `name` - Configuration name (exact, case-sensitive)
    /// * `request` - Tagged request payload
    /// * `chain` - Proxy chain supplied by the transport, frontline caller first
    pub async fn submit(
        &self,
        name: &str,
        request: ModificationRequest,
        chain: &ProxyChain,
    ) -> SubmissionResult {
        let submission_id = Uuid::new_v4();
        let started = Instant::now();

        debug!(
            submission_id = %submission_id,
            service = %name,
            stage = %SubmissionStage::Received,
            "Submission received"
        );

        let outcome = self.run(submission_id, name, request, chain).await;
        let elapsed = started.elapsed().as_millis();
        let operation_time_ms = u64::try_from(elapsed).ok();

        match &outcome {
            Ok(()) => {
                info!(
                    submission_id = %submission_id,
                    service = %name,
                    operation_time_ms = ?operation_time_ms,
                    "Submission succeeded"
                );
            }
            Err(e) if e.is_client_error() => {
                warn!(
                    submission_id = %submission_id,
                    service = %name,
                    stage = %e.stage(),
                    code = e.code(),
                    error = %e,
                    "Submission rejected"
                );
            }
            Err(e) => {
                error!(
                    submission_id = %submission_id,
                    service = %name,
                    stage = %e.stage(),
                    code = e.code(),
                    cause = ?e.cause(),
                    "Submission failed"
                );
            }
        }

        outcome.map(|()| SubmissionReceipt {
            submission_id,
            operation_time_ms,
        })
    }

    async fn run(
        &self,
        submission_id: Uuid,
        name: &str,
        request: ModificationRequest,
        chain: &ProxyChain,
    ) -> Result<(), SubmissionError> {
        let principals = resolve(chain)?;
        info!(
            submission_id = %submission_id,
            service = %name,
            principals = %principals,
            request_variant = %request.variant(),
            "Submission audit"
        );

        let configuration = self
            .registry
            .lookup(name)
            .ok_or_else(|| SubmissionError::NotFound {
                name: name.to_string(),
            })?;
        debug!(
            submission_id = %submission_id,
            stage = %SubmissionStage::LookedUp,
            "Stage entered"
        );

        validate_request_type(configuration, &request)?;
        debug!(
            submission_id = %submission_id,
            stage = %SubmissionStage::TypeValidated,
            "Stage entered"
        );

        self.gate
            .authorize(&principals, configuration.required_roles())
            .await?;
        debug!(
            submission_id = %submission_id,
            stage = %SubmissionStage::Authorized,
            "Stage entered"
        );

        self.dispatcher
            .dispatch(configuration, request, principals)
            .await?;
        debug!(
            submission_id = %submission_id,
            stage = %SubmissionStage::Executed,
            "Stage entered"
        );

        Ok(())
    }
}
