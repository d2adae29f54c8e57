//! HTTP Handlers
//!
//! One handler per endpoint; the model adapter is reached only through the
//! injected `InferenceService`.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use posturepal_core::application::InferenceService;
use posturepal_core::domain::FeatureVector;
use posturepal_core::port::ModelAdapter;
use std::sync::Arc;
use tracing::{error, warn};

use crate::error::{rejection_response, to_http_response};
use crate::types::HealthResponse;

/// Shared router state
#[derive(Clone)]
pub struct AppState {
    service: InferenceService,
    strict_error_status: bool,
}

impl AppState {
    pub fn new(adapter: Arc<dyn ModelAdapter>, strict_error_status: bool) -> Self {
        Self {
            service: InferenceService::new(adapter),
            strict_error_status,
        }
    }
}

/// GET /
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

/// POST /predict
///
/// Body rejections short-circuit before the adapter is called.
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<FeatureVector>, JsonRejection>,
) -> Response {
    let Json(features) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(status = %rejection.status(), reason = %rejection.body_text(), "Rejected predict request");
            return rejection_response(rejection);
        }
    };

    match state.service.predict(features).await {
        Ok(prediction) => (StatusCode::OK, Json(prediction)).into_response(),
        Err(e) => {
            error!(error = %e, "Prediction failed");
            to_http_response(e, state.strict_error_status)
        }
    }
}
