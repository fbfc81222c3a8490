//! Error types for DonorKernels.

use thiserror::Error;

/// Result type alias using `AnalysisError`.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur during kernel operations.
///
/// Data-quality problems (unparsable amounts or dates) are never errors;
/// they are recovered locally by the ingest conversion. Only invalid
/// invocations reject at the boundary, before any processing begins.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Kernel not found in registry.
    #[error("Kernel not found: {0}")]
    KernelNotFound(String),

    /// Kernel already registered.
    #[error("Kernel already registered: {0}")]
    KernelAlreadyRegistered(String),

    /// Input or configuration validation failed.
    #[error("Input validation failed: {0}")]
    ValidationError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// A pattern detector failed; siblings are unaffected.
    #[error("Detector '{detector}' failed: {message}")]
    DetectorFailed {
        /// Kernel id of the failing detector.
        detector: String,
        /// Failure description.
        message: String,
    },

    /// Timeout waiting for a result.
    #[error("Timeout waiting for result after {0:?}")]
    Timeout(std::time::Duration),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AnalysisError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        AnalysisError::ValidationError(msg.into())
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        AnalysisError::InternalError(msg.into())
    }

    /// Create a kernel not found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        AnalysisError::KernelNotFound(id.into())
    }

    /// Create a detector failure error.
    #[must_use]
    pub fn detector(detector: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::DetectorFailed {
            detector: detector.into(),
            message: message.into(),
        }
    }

    /// Returns true if this is a recoverable error.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::Timeout(_)
                | AnalysisError::ValidationError(_)
                | AnalysisError::DetectorFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::not_found("fraud/analysis");
        assert_eq!(err.to_string(), "Kernel not found: fraud/analysis");

        let err = AnalysisError::detector("fraud/round-number", "bad config");
        assert_eq!(
            err.to_string(),
            "Detector 'fraud/round-number' failed: bad config"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(AnalysisError::validation("negative threshold").is_recoverable());
        assert!(!AnalysisError::internal("broken").is_recoverable());
    }
}
