// Central Error Type for the Application

use thiserror::Error;

use crate::port::AdapterError;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Inference error: {0}")]
    Inference(#[from] AdapterError),

    #[error("Model adapter panicked: {0}")]
    AdapterPanicked(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Failure detail as reported to API callers.
    ///
    /// Adapter faults are reported with their own message, without the
    /// application-level prefix.
    pub fn detail(&self) -> String {
        match self {
            AppError::Inference(e) => e.to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_inference_prefix() {
        let err = AppError::from(AdapterError::MissingFeature("neck_angle".to_string()));

        assert_eq!(err.to_string(), "Inference error: Missing feature: neck_angle");
        assert_eq!(err.detail(), "Missing feature: neck_angle");
    }

    #[test]
    fn test_detail_keeps_panic_context() {
        let err = AppError::AdapterPanicked("index out of bounds".to_string());
        assert_eq!(err.detail(), "Model adapter panicked: index out of bounds");
    }
}
