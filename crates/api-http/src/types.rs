//! HTTP Request/Response Types
//!
//! The request body of `POST /predict` is `posturepal_core::domain::FeatureVector`
//! and the success body is `posturepal_core::domain::Prediction`; only the
//! envelope types owned by the facade live here.

use serde::{Deserialize, Serialize};

/// Message returned by the liveness endpoint
pub const HEALTH_MESSAGE: &str = "PosturePal Python API running!";

/// Error label for any model adapter failure
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// Error label for request bodies that do not match the feature schema
pub const INVALID_REQUEST: &str = "Invalid request";

/// GET /
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub message: String,
}

impl HealthResponse {
    pub fn running() -> Self {
        Self {
            message: HEALTH_MESSAGE.to_string(),
        }
    }
}

/// Error body shared by inference failures and rejected requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl ErrorResponse {
    pub fn prediction_failed(detail: impl Into<String>) -> Self {
        Self {
            error: PREDICTION_FAILED.to_string(),
            detail: detail.into(),
        }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self {
            error: INVALID_REQUEST.to_string(),
            detail: detail.into(),
        }
    }
}
