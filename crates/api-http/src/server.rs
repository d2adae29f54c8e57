//! HTTP Server
//!
//! Builds the axum router (CORS + request tracing) and runs it on TCP with
//! graceful shutdown.

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use posturepal_core::port::ModelAdapter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;
use crate::handler::{self, AppState};

const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 8001;

/// Local frontend (Vite) and Node proxy origins
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// HTTP Server Configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    /// Answer inference failures with 500 instead of 200
    pub strict_error_status: bool,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| o.to_string())
                .collect(),
            allow_credentials: true,
            strict_error_status: false,
        }
    }
}

/// CORS policy: explicit origin allow-list, any method and header.
///
/// Methods and headers are mirrored from the preflight request because
/// wildcards are not allowed together with credentials.
pub fn cors_layer(config: &HttpServerConfig) -> Result<CorsLayer, ApiError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            if origin.trim() == "*" {
                return Err(ApiError::InvalidOrigin {
                    origin: origin.clone(),
                    reason: "wildcard is not allowed, list origins explicitly".to_string(),
                });
            }
            HeaderValue::from_str(origin.trim()).map_err(|e| ApiError::InvalidOrigin {
                origin: origin.clone(),
                reason: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials))
}

/// Route table
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handler::health))
        .route("/predict", post(handler::predict))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// HTTP Server
pub struct HttpServer {
    config: HttpServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, adapter: Arc<dyn ModelAdapter>) -> Self {
        let state = AppState::new(adapter, config.strict_error_status);
        Self { config, state }
    }

    /// Router with CORS and tracing layers applied
    pub fn router(&self) -> Result<Router, ApiError> {
        let cors = cors_layer(&self.config)?;
        Ok(build_router(self.state.clone(), cors))
    }

    /// Bind and serve in a background task
    ///
    /// Port 0 binds an ephemeral port; `ServerHandle::local_addr` reports it.
    pub async fn start(self) -> Result<ServerHandle, ApiError> {
        let app = self.router()?;
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ApiError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        info!(
            addr = %local_addr,
            origins = ?self.config.allowed_origins,
            strict_error_status = self.config.strict_error_status,
            "HTTP server listening"
        );

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

/// Handle to a running server
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Resolves when the serve task exits without a stop request.
    ///
    /// Must not be followed by `stop` once it has resolved.
    pub async fn closed(&mut self) -> Result<(), ApiError> {
        (&mut self.task)
            .await
            .map_err(|e| ApiError::Join(e.to_string()))??;
        Ok(())
    }

    /// Stop accepting connections and wait for in-flight requests
    pub async fn stop(self) -> Result<(), ApiError> {
        let _ = self.shutdown_tx.send(());

        self.task
            .await
            .map_err(|e| ApiError::Join(e.to_string()))??;

        info!("HTTP server stopped");
        Ok(())
    }
}
