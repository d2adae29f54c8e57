//! Logging and optional OpenTelemetry export
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: overrides `log.filter`
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
//! - `OTEL_SERVICE_NAME`: Service name (default: posturepal-server)
//!
//! ```text
//! OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
//! OTEL_SERVICE_NAME=posturepal-dev \
//!     ./posturepal-server
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_subscriber::{Layer, Registry};

use crate::settings::{LogFormat, LogSettings};

const OTLP_ENDPOINT_ENV: &str = "OTEL_EXPORTER_OTLP_ENDPOINT";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
pub fn init(settings: &LogSettings) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .with_context(|| format!("Invalid log filter: {}", settings.filter))?;

    let endpoint = std::env::var(OTLP_ENDPOINT_ENV).ok();
    let otel = match endpoint.as_deref() {
        Some(endpoint) => otel_layer(endpoint)?,
        None => None,
    };
    let otel_enabled = otel.is_some();

    let registry = tracing_subscriber::registry().with(otel).with(env_filter);

    match settings.format {
        // Production: JSON structured logging
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => registry.with(fmt::layer().pretty()).init(),
    }

    match endpoint {
        None => tracing::debug!("OpenTelemetry not configured ({} not set)", OTLP_ENDPOINT_ENV),
        Some(endpoint) if otel_enabled => {
            tracing::info!(endpoint = %endpoint, "OpenTelemetry export enabled")
        }
        Some(_) => {
            tracing::warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
            tracing::warn!("Rebuild with: cargo build --features telemetry");
        }
    }

    Ok(())
}

#[cfg(feature = "telemetry")]
fn otel_layer(endpoint: &str) -> Result<Option<BoxedLayer>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry_otlp::WithExportConfig;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "posturepal-server".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("Failed to build OTLP exporter")?;

    let provider = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(Some(Box::new(
        tracing_opentelemetry::layer().with_tracer(tracer),
    )))
}

#[cfg(not(feature = "telemetry"))]
fn otel_layer(_endpoint: &str) -> Result<Option<BoxedLayer>> {
    Ok(None)
}

/// Flush pending spans
pub fn shutdown() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}
