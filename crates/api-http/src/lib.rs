//! HTTP API Layer
//!
//! Liveness and predict endpoints for the PosturePal service, served with axum.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::AppState;
pub use server::{HttpServer, HttpServerConfig, ServerHandle};
