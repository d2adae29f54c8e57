//! PosturePal CLI - Command-line client for the PosturePal inference server

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use posturepal_api_http::types::{ErrorResponse, HealthResponse};
use posturepal_core::domain::{FeatureVector, Prediction};
use tabled::{Table, Tabled};

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Parser)]
#[command(name = "posturepal")]
#[command(about = "PosturePal inference server CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server base URL
    #[arg(long, env = "POSTUREPAL_URL", default_value = DEFAULT_SERVER_URL)]
    url: String,

    /// Request timeout in seconds
    #[arg(long, env = "POSTUREPAL_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is running
    Health,

    /// Classify one set of posture features
    Predict(PredictArgs),
}

#[derive(Args)]
struct PredictArgs {
    /// Torso angle (degrees)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    torso_angle: Option<f64>,

    /// Neck angle (degrees)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    neck_angle: Option<f64>,

    /// Shoulder tilt (degrees)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    shoulder_tilt: Option<f64>,

    /// Hip tilt (degrees)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    hip_tilt: Option<f64>,

    /// Forward head offset (normalized)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    head_forward_z: Option<f64>,

    /// Head-to-shoulder distance (normalized)
    #[arg(long, required_unless_present = "json", allow_negative_numbers = true)]
    head_to_shoulder: Option<f64>,

    /// Raw JSON request body instead of individual flags
    #[arg(long, conflicts_with_all = [
        "torso_angle", "neck_angle", "shoulder_tilt",
        "hip_tilt", "head_forward_z", "head_to_shoulder",
    ])]
    json: Option<String>,
}

impl PredictArgs {
    fn body(&self) -> Result<serde_json::Value> {
        if let Some(raw) = &self.json {
            return serde_json::from_str(raw).context("Invalid JSON body");
        }

        // clap guarantees every flag is present when --json is absent
        let features = FeatureVector {
            torso_angle: self.torso_angle.unwrap_or_default(),
            neck_angle: self.neck_angle.unwrap_or_default(),
            shoulder_tilt: self.shoulder_tilt.unwrap_or_default(),
            hip_tilt: self.hip_tilt.unwrap_or_default(),
            head_forward_z: self.head_forward_z.unwrap_or_default(),
            head_to_shoulder: self.head_to_shoulder.unwrap_or_default(),
        };
        Ok(serde_json::to_value(features)?)
    }
}

/// Terminal outcome of one predict call
#[derive(Debug, PartialEq)]
enum PredictOutcome {
    Success(Prediction),
    /// Server accepted the request but the model failed
    Failed(ErrorResponse),
    /// Server rejected the request body
    Rejected { status: u16, detail: String },
    /// Server answered with a 5xx that is not a model failure
    ServerError { status: u16, detail: String },
}

fn interpret(status: u16, text: &str) -> Result<PredictOutcome> {
    let body: Option<serde_json::Value> = serde_json::from_str(text).ok();
    let envelope = body
        .as_ref()
        .and_then(|b| serde_json::from_value::<ErrorResponse>(b.clone()).ok());

    if (400..500).contains(&status) {
        let detail = envelope
            .map(|e| e.detail)
            .unwrap_or_else(|| text.to_string());
        return Ok(PredictOutcome::Rejected { status, detail });
    }

    // Model failures may arrive with a 200 status
    if let Some(failure) = envelope {
        return Ok(PredictOutcome::Failed(failure));
    }

    if status >= 500 {
        return Ok(PredictOutcome::ServerError {
            status,
            detail: text.to_string(),
        });
    }

    let body = body.context("Response is not JSON")?;
    let prediction: Prediction =
        serde_json::from_value(body).context("Unexpected prediction payload")?;
    Ok(PredictOutcome::Success(prediction))
}

/// Prediction on success; every other outcome is an error
fn into_prediction(outcome: PredictOutcome) -> Result<Prediction> {
    match outcome {
        PredictOutcome::Success(prediction) => Ok(prediction),
        PredictOutcome::Failed(failure) => {
            anyhow::bail!("{}: {}", failure.error, failure.detail)
        }
        PredictOutcome::Rejected { status, detail } => {
            anyhow::bail!("Request rejected ({}): {}", status, detail)
        }
        PredictOutcome::ServerError { status, detail } => {
            anyhow::bail!("Server error ({}): {}", status, detail)
        }
    }
}

/// Transport failures: no HTTP response was received
fn transport_error(err: reqwest::Error, timeout: Duration) -> anyhow::Error {
    let context = if err.is_timeout() {
        format!("Server did not respond within {}s", timeout.as_secs())
    } else if err.is_connect() {
        "Failed to connect to server".to_string()
    } else {
        "Request failed".to_string()
    };
    anyhow::Error::new(err).context(context)
}

#[derive(Tabled)]
struct ProbaRow {
    class: String,
    probability: String,
}

fn proba_rows(prediction: &Prediction) -> Vec<ProbaRow> {
    let mut entries: Vec<(&String, &f64)> = prediction.proba.iter().collect();
    entries.sort_by(|a, b| b.1.total_cmp(a.1));

    entries
        .into_iter()
        .map(|(label, p)| ProbaRow {
            class: label.clone(),
            probability: format!("{:.1}%", p * 100.0),
        })
        .collect()
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.to_string(),
            timeout,
        })
    }

    async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(endpoint(&self.base_url, "/"))
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Server error ({})", status.as_u16());
        }

        response
            .json()
            .await
            .map_err(|e| transport_error(e, self.timeout))
            .context("Failed to parse response")
    }

    /// Status code and raw body of `POST /predict`
    async fn predict(&self, body: &serde_json::Value) -> Result<(u16, String)> {
        let response = self
            .http
            .post(endpoint(&self.base_url, "/predict"))
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        Ok((status, text))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.url, Duration::from_secs(cli.timeout))?;

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;

            println!("  {} {}", "Status:".bold(), "ONLINE".green());
            println!("  {} {}", "Message:".bold(), health.message);
        }

        Commands::Predict(args) => {
            let body = args.body()?;
            let (status, text) = client.predict(&body).await?;

            if cli.output == OutputFormat::Json {
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
                    Err(_) => println!("{}", text),
                }
            }

            let prediction = into_prediction(interpret(status, &text)?)?;
            if cli.output == OutputFormat::Table {
                println!(
                    "{} {} (class {}, {:.1}% confidence)",
                    "✓".green().bold(),
                    prediction.label.bold(),
                    prediction.class_id,
                    prediction.confidence * 100.0
                );
                println!();
                println!("{}", Table::new(proba_rows(&prediction)));
            }
        }
    }

    Ok(())
}
