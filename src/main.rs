mod api;
mod input;
mod logging;
mod model;
mod pipeline;
mod schema;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::api::types::{PredictResponse, ValidationErrorResponse};
use crate::api::{AppState, create_router};
use crate::input::load_artifacts;
use crate::model::StandardScaler;
use crate::pipeline::stage1_validate::{FieldIssue, ValidationError};
use crate::pipeline::{PredictionError, PredictionService};
use crate::schema::{RangePolicy, builtin_features};

#[derive(Debug, Parser)]
#[command(
    name = "wine-quality-api",
    version,
    about = "Serve wine quality predictions from a fitted scaler and gradient-boosted regressor."
)]
struct Cli {
    /// Default tracing filter; RUST_LOG takes precedence.
    #[arg(long, global = true, env = "WINEQ_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve(ServeArgs),
    /// Score a single JSON record and print the response body.
    Predict(PredictArgs),
    /// Load both artifacts and report whether they match the feature schema.
    Check(ArtifactArgs),
}

#[derive(Debug, Clone, Args)]
struct ArtifactArgs {
    #[arg(
        long = "scaler",
        env = "WINEQ_SCALER_PATH",
        default_value = "models/scaler.json"
    )]
    scaler_path: PathBuf,

    #[arg(
        long = "model",
        env = "WINEQ_MODEL_PATH",
        default_value = "models/xgb_best_all_features.json"
    )]
    model_path: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct ServeArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    #[arg(long, env = "WINEQ_HOST", default_value = "127.0.0.1")]
    host: String,

    #[arg(long, env = "WINEQ_PORT", default_value_t = 8000)]
    port: u16,

    #[arg(long, value_enum, env = "WINEQ_RANGE_POLICY", default_value_t = RangePolicy::Warn)]
    range_policy: RangePolicy,

    #[arg(long, env = "WINEQ_REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Keep serving /health and metadata when artifacts fail to load.
    #[arg(long)]
    allow_degraded: bool,
}

#[derive(Debug, Clone, Args)]
struct PredictArgs {
    #[command(flatten)]
    artifacts: ArtifactArgs,

    /// JSON record to score; "-" reads stdin.
    #[arg(long, default_value = "-")]
    input: PathBuf,

    #[arg(long, value_enum, env = "WINEQ_RANGE_POLICY", default_value_t = RangePolicy::Warn)]
    range_policy: RangePolicy,

    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    Rejected,
}

fn main() {
    let cli = Cli::parse();
    logging::init(&cli.log_level);
    match run(cli) {
        Ok(Outcome::Done) => {}
        Ok(Outcome::Rejected) => std::process::exit(2),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<Outcome, String> {
    match cli.command {
        Command::Serve(args) => serve(args).map(|_| Outcome::Done),
        Command::Predict(args) => predict_once(args),
        Command::Check(args) => check(&args).map(|_| Outcome::Done),
    }
}

fn build_state(args: &ServeArgs) -> Result<AppState, String> {
    let state = match load_artifacts(&args.artifacts.scaler_path, &args.artifacts.model_path) {
        Ok(artifacts) => {
            AppState::ready(PredictionService::new(Arc::new(artifacts), args.range_policy))
        }
        Err(err) if args.allow_degraded => {
            crate::error!("artifact load failed; serving without a model: {}", err);
            AppState::unloaded()
        }
        Err(err) => return Err(err.to_string()),
    };
    Ok(state.with_request_timeout(Duration::from_millis(args.request_timeout_ms)))
}

fn serve(args: ServeArgs) -> Result<(), String> {
    // Artifacts are fully loaded before the listener exists.
    let state = build_state(&args)?;
    let app = create_router(state);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port))
            .await
            .map_err(|e| format!("failed to bind {}:{}: {e}", args.host, args.port))?;
        if let Ok(addr) = listener.local_addr() {
            crate::info!("listening on http://{}", addr);
        }
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| format!("server error: {e}"))
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            crate::warn!("cannot listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                crate::warn!("cannot listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    crate::info!("shutdown signal received");
}

fn predict_once(args: PredictArgs) -> Result<Outcome, String> {
    let artifacts = load_artifacts(&args.artifacts.scaler_path, &args.artifacts.model_path)
        .map_err(|e| e.to_string())?;
    let service = PredictionService::new(Arc::new(artifacts), args.range_policy);

    let text = read_input(&args.input)?;
    let (outcome, body) = score_text(&service, &text)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&body)
    } else {
        serde_json::to_string(&body)
    }
    .map_err(|e| format!("cannot render response: {e}"))?;
    println!("{rendered}");
    Ok(outcome)
}

fn score_text(service: &PredictionService, text: &str) -> Result<(Outcome, Value), String> {
    let rejected = |err: &ValidationError| -> Result<(Outcome, Value), String> {
        let body = serde_json::to_value(ValidationErrorResponse::from(err))
            .map_err(|e| format!("cannot render response: {e}"))?;
        Ok((Outcome::Rejected, body))
    };

    let payload: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return rejected(&ValidationError::body(FieldIssue::Malformed(e.to_string()))),
    };
    match service.predict(&payload) {
        Ok(result) => {
            let body = serde_json::to_value(PredictResponse::from(result))
                .map_err(|e| format!("cannot render response: {e}"))?;
            Ok((Outcome::Done, body))
        }
        Err(PredictionError::InvalidInput(err)) => rejected(&err),
        Err(PredictionError::Inference(err)) => Err(format!("inference failed: {err}")),
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    let mut text = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("cannot read stdin: {e}"))?;
    } else {
        text = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    }
    Ok(text)
}

fn check(args: &ArtifactArgs) -> Result<(), String> {
    let artifacts =
        load_artifacts(&args.scaler_path, &args.model_path).map_err(|e| e.to_string())?;
    println!(
        "scaler: {} ({} features)",
        artifacts.scaler_path.display(),
        artifacts.scaler.n_features()
    );
    println!(
        "model: {} ({} trees, base_score={})",
        artifacts.model_path.display(),
        artifacts.regressor.n_trees(),
        artifacts.regressor.base_score()
    );
    let names = if artifacts.regressor.feature_names().is_some() {
        "recorded, matches schema"
    } else {
        "not recorded, positional"
    };
    println!("feature names: {names}");

    let drift = scaler_round_trip_error(&artifacts.scaler)?;
    if drift > ROUND_TRIP_TOLERANCE {
        return Err(format!(
            "scaler round-trip error {drift:e} exceeds {ROUND_TRIP_TOLERANCE:e}"
        ));
    }
    println!("scaler round-trip: max error {drift:e}");
    Ok(())
}

const ROUND_TRIP_TOLERANCE: f64 = 1e-6;

/// Largest absolute difference after scaling the documented example record
/// and mapping it back.
fn scaler_round_trip_error(scaler: &StandardScaler) -> Result<f64, String> {
    let examples: Vec<f64> = builtin_features().iter().map(|def| def.example).collect();
    let scaled = scaler.transform(&examples).map_err(|e| e.to_string())?;
    let restored = scaler
        .inverse_transform(&scaled)
        .map_err(|e| e.to_string())?;
    Ok(examples
        .iter()
        .zip(&restored)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max))
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
