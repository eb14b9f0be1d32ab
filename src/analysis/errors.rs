use serde::Serialize;
use thiserror::Error;

use crate::network::errors::FetchError;

// * Request-level failures. Per-listing failures never reach this type.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Failed to fetch search results: {0}")]
    Fetch(#[from] FetchError),
}

/// Error shape returned to callers: `{ "errorKind": ..., "message": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorRecord {
    pub error_kind: &'static str,
    pub message: String,
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "ValidationError",
            AnalysisError::Fetch(_) => "FetchError",
        }
    }

    /// True when the caller can fix the request
    pub fn is_client_error(&self) -> bool {
        matches!(self, AnalysisError::Validation(_))
    }

    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord {
            error_kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_record() {
        let err = AnalysisError::Validation("keyword is required".to_string());
        let record = err.to_record();

        assert!(err.is_client_error());
        assert_eq!(record.error_kind, "ValidationError");
        assert_eq!(record.message, "Invalid request: keyword is required");
    }

    #[test]
    fn test_fetch_record_carries_underlying_message() {
        let err = AnalysisError::from(FetchError::NavigationTimeout(30_000));
        let json = serde_json::to_value(err.to_record()).unwrap();

        assert!(!err.is_client_error());
        assert_eq!(json["errorKind"], "FetchError");
        assert!(json["message"].as_str().unwrap().contains("30000ms"));
    }
}
