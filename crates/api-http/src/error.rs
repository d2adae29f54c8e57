//! HTTP Error Mapping
//!
//! Maps application errors and request rejections to HTTP responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use posturepal_core::error::AppError;
use thiserror::Error;

use crate::types::ErrorResponse;

/// Server lifecycle errors (startup, bind, serve)
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid CORS origin '{origin}': {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("Server task failed: {0}")]
    Join(String),
}

/// Convert an inference failure to the `Prediction failed` payload
///
/// The transport status is 200 unless `strict_status` is set, in which case
/// it is 500. The body is the same either way.
pub fn to_http_response(err: AppError, strict_status: bool) -> Response {
    let status = if strict_status {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    (status, Json(ErrorResponse::prediction_failed(err.detail()))).into_response()
}

/// Convert a body rejection (bad JSON, missing field, wrong type, wrong
/// content type) to a client error
pub fn rejection_response(rejection: JsonRejection) -> Response {
    let status = rejection.status();
    (status, Json(ErrorResponse::invalid_request(rejection.body_text()))).into_response()
}
