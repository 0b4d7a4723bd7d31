//! Built-in jobs
//!
//! Real deployments register their own data-layer jobs in a
//! [`crate::config::JobCatalog`]. The jobs here carry no data-layer effects.

use async_trait::async_trait;
use modification_core::{ModificationRequest, ResolvedPrincipalSet};
use tracing::info;

use crate::job::{JobError, ModificationJob};

/// Records the request in the log and completes
///
/// Useful as a dry-run binding while a configuration's real job is wired up.
#[derive(Debug, Default)]
pub struct LogJob;

impl LogJob {
    /// Catalog name of this job
    pub const NAME: &'static str = "log";

    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ModificationJob for LogJob {
    async fn execute(
        &self,
        request: ModificationRequest,
        principals: ResolvedPrincipalSet,
    ) -> Result<(), JobError> {
        info!(
            request_variant = %request.variant(),
            fields = %serde_json::Value::Object(request.fields().clone()),
            frontline = %principals.frontline(),
            proxied = principals.proxied().len(),
            "Log job received modification request"
        );
        Ok(())
    }

    fn description(&self) -> &str {
        "log-only job"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modification_core::{resolve, ProxyChain};

    #[tokio::test]
    async fn test_log_job_completes() {
        let principals = resolve(&ProxyChain::single("alice", "CA1")).unwrap();
        let request = ModificationRequest::new("PurgeRequest")
            .with_field("table", serde_json::json!("shard_2024"))
            .unwrap();

        assert!(LogJob::new().execute(request, principals).await.is_ok());
    }
}
