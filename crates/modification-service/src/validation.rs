//! Request Type Validator
//!
//! Compares the request's variant tag with the configuration's expected
//! tag. This runs before authorization and dispatch, so a wrong-shaped
//! request never reaches a role lookup or a job.

use modification_core::ModificationRequest;
use tracing::warn;

use crate::error::SubmissionError;
use crate::registry::ModificationConfiguration;

/// Check that a request carries the variant a configuration expects
pub fn validate_request_type(
    configuration: &ModificationConfiguration,
    request: &ModificationRequest,
) -> Result<(), SubmissionError> {
    let expected = configuration.request_variant();
    let actual = request.variant();

    if expected == actual {
        return Ok(());
    }

    warn!(
        service = %configuration.name(),
        expected = %expected,
        actual = %actual,
        "Request variant does not match configuration"
    );

    Err(SubmissionError::TypeMismatch {
        expected: expected.clone(),
        actual: actual.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::LogJob;
    use std::sync::Arc;

    fn purge_config() -> ModificationConfiguration {
        ModificationConfiguration::new("purge", "PurgeRequest", Arc::new(LogJob::new()))
    }

    #[test]
    fn test_matching_variant() {
        let request = ModificationRequest::new("PurgeRequest");
        assert!(validate_request_type(&purge_config(), &request).is_ok());
    }

    #[test]
    fn test_mismatch_reports_both_tags() {
        let request = ModificationRequest::new("MutableMetadataRequest");

        match validate_request_type(&purge_config(), &request) {
            Err(SubmissionError::TypeMismatch { expected, actual }) => {
                assert_eq!(expected.as_str(), "PurgeRequest");
                assert_eq!(actual.as_str(), "MutableMetadataRequest");
            }
            other => panic!("Expected TypeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_variant_comparison_is_exact() {
        let request = ModificationRequest::new("purgerequest");
        assert!(validate_request_type(&purge_config(), &request).is_err());
    }
}
