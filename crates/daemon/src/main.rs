//! PosturePal Inference Server - Main Entry Point

mod settings;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

// Import workspace crates
use posturepal_api_http::HttpServer;
use posturepal_infra_model::LinearModelAdapter;
use settings::Settings;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration
    let settings = Settings::load().context("Failed to load configuration")?;

    // 2. Initialize logging (pretty or JSON, optional OpenTelemetry)
    telemetry::init(&settings.log)?;

    info!("PosturePal inference server v{} starting...", VERSION);
    info!(
        core_version = posturepal_core::VERSION,
        "Configuration loaded"
    );

    // 3. Load the model once; it stays immutable for the process lifetime
    let model_path = settings.model.model_path();
    let meta_path = settings.model.meta_path();
    info!(model_path = %model_path.display(), meta_path = %meta_path.display(), "Loading model...");

    let adapter = LinearModelAdapter::load(&model_path, &meta_path)
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

    // 4. Start HTTP server (adapter injected as shared read-only handle)
    let server = HttpServer::new(settings.http_config(), Arc::new(adapter));
    let mut handle = server.start().await.context("HTTP server start failed")?;

    info!("✅ Ready. Listening on http://{}", handle.local_addr());
    info!("   GET  /         - liveness");
    info!("   POST /predict  - posture classification");
    info!("Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal, or the server dying on its own
    let server_exit = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            None
        }
        result = handle.closed() => Some(result),
    };

    if let Some(result) = server_exit {
        error!(result = ?result, "HTTP server exited unexpectedly");
        telemetry::shutdown();
        result.context("HTTP server stopped serving")?;
        anyhow::bail!("HTTP server stopped serving");
    }

    info!("Shutdown signal received. Exiting gracefully...");

    // 6. Graceful shutdown (bounded wait for in-flight requests)
    match tokio::time::timeout(Duration::from_secs(5), handle.stop()).await {
        Ok(result) => result.context("HTTP server stop failed")?,
        Err(_) => tracing::warn!("In-flight requests did not finish within 5s"),
    }
    telemetry::shutdown();

    info!("Shutdown complete.");

    Ok(())
}
