//! Dispatcher
//!
//! Runs the job bound to a configuration. Each job runs on its own tokio
//! task, so a slow or blocking job does not hold up other submissions and a
//! panicking job surfaces as `ExecutionError` instead of tearing down the
//! caller. Jobs are invoked once; nothing here retries or rolls back.
//!
//! Dropping the future returned by [`Dispatcher::dispatch`] does not cancel
//! the job. A dispatched job always runs to completion or failure.

use modification_core::{ModificationRequest, ResolvedPrincipalSet};
use std::any::Any;
use std::sync::Arc;
use tracing::{error, info};

use crate::error::SubmissionError;
use crate::job::JobError;
use crate::registry::ModificationConfiguration;

/// Invokes validated, authorized requests against their jobs
#[derive(Debug, Clone, Copy, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Run the configuration's job for a request
    ///
    /// Must be called from within a tokio runtime.
    pub async fn dispatch(
        &self,
        configuration: &ModificationConfiguration,
        request: ModificationRequest,
        principals: ResolvedPrincipalSet,
    ) -> Result<(), SubmissionError> {
        let service = configuration.name().to_string();
        let job = Arc::clone(configuration.job());

        info!(
            service = %service,
            job = job.description(),
            principals = %principals,
            "Dispatching modification job"
        );

        let handle = tokio::spawn(async move { job.execute(request, principals).await });

        let outcome = match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(JobError::Panicked(panic_message(join_err.into_panic())))
            }
            Err(_) => Err(JobError::Aborted),
        };

        outcome.map_err(|source| {
            error!(
                service = %service,
                error = %source,
                cause = ?source,
                "Modification job failed"
            );
            SubmissionError::ExecutionError { service, source }
        })
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
