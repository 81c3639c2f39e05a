//! Rail Sentinel - Rail Asset Failure Prediction Dashboard
//!
//! Serves a single-page dashboard where vibration and temperature sliders
//! drive a pretrained LSTM (failure probability) and isolation forest
//! (anomaly score).
//!
//! # Usage
//!
//! ```bash
//! # Serve the dashboard on the configured address
//! cargo run --release
//!
//! # One-shot prediction printed as JSON
//! ./rail-sentinel predict --vibration 12.5 --temperature 64
//!
//! # Synthetic history as CSV
//! ./rail-sentinel history --days 7 > history.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RAIL_SENTINEL_CONFIG`: Path to a TOML config file
//! - `RAIL_SENTINEL_ADDR`: Server bind address (overrides config)
//! - `RAIL_SENTINEL_CORS_ORIGINS`: Extra allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use rail_sentinel::api::handlers::validate_input;
use rail_sentinel::api::{create_app, DashboardState};
use rail_sentinel::config::{self, defaults, DashboardConfig};
use rail_sentinel::history;
use rail_sentinel::inference;
use rail_sentinel::models::ModelBundle;
use rail_sentinel::types::SensorInput;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "rail-sentinel")]
#[command(about = "Rail asset failure prediction dashboard")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8501")
    #[arg(short, long, global = true, env = "RAIL_SENTINEL_ADDR")]
    addr: Option<String>,

    /// Directory holding the model artifacts
    #[arg(long, value_name = "DIR", global = true)]
    models_dir: Option<PathBuf>,

    /// Path to a TOML config file (takes precedence over RAIL_SENTINEL_CONFIG)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run one prediction and print it as JSON
    Predict {
        #[arg(long)]
        vibration: f64,
        #[arg(long)]
        temperature: f64,
        /// Rolling average window (hours)
        #[arg(long, default_value = "24", value_parser = clap::value_parser!(u32).range(1..))]
        window: u32,
    },

    /// Print synthetic sensor history as CSV
    History {
        /// Days to simulate
        #[arg(long, default_value_t = defaults::DEFAULT_HISTORY_DAYS,
              value_parser = clap::value_parser!(u32).range(1..=i64::from(defaults::MAX_HISTORY_DAYS)))]
        days: u32,
    },
}

// ============================================================================
// Configuration
// ============================================================================

/// Resolve config from CLI flags (or their env vars), then files, then defaults.
fn resolve_config(args: &CliArgs) -> Result<DashboardConfig> {
    let mut cfg = match &args.config {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DashboardConfig::load(),
    };

    if let Some(addr) = &args.addr {
        cfg.server.addr.clone_from(addr);
    }
    if let Some(dir) = &args.models_dir {
        cfg.models.dir.clone_from(dir);
    }
    Ok(cfg)
}

// ============================================================================
// Subcommands
// ============================================================================

/// Build a reading and reject it with the same rules the HTTP API applies.
fn checked_input(cfg: &DashboardConfig, vibration: f64, temperature: f64, window: u32) -> Result<SensorInput> {
    let input = SensorInput {
        vibration,
        temperature,
        rolling_window: window,
    };
    if let Err(msg) = validate_input(&input, cfg) {
        bail!("Invalid reading: {msg}");
    }
    Ok(input)
}

fn run_predict(cfg: &DashboardConfig, vibration: f64, temperature: f64, window: u32) -> Result<()> {
    let input = checked_input(cfg, vibration, temperature, window)?;
    let bundle = ModelBundle::load(&cfg.models);
    for e in bundle.load_errors() {
        warn!("{}", e);
    }
    let prediction = inference::predict(&bundle, &input, &cfg.risk, &mut rand::thread_rng())
        .context("Inference failed")?;
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}

fn run_history(days: u32) {
    let data = history::generate(days, chrono::Utc::now(), &mut rand::thread_rng());
    print!("{}", data.to_csv());
}

async fn run_server(cfg: &DashboardConfig) -> Result<()> {
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Rail Sentinel - Rail Asset Failure Prediction System");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    info!(dir = %cfg.models.dir.display(), "Loading model artifacts...");
    let bundle = ModelBundle::load(&cfg.models);
    if bundle.all_loaded() {
        info!("✓ All model artifacts loaded");
    } else {
        warn!(
            errors = bundle.load_errors().len(),
            "Some model artifacts failed to load; affected metrics will be skipped"
        );
    }

    let state = DashboardState::new(bundle, cfg.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&cfg.server.addr)
        .await
        .with_context(|| format!("Failed to bind to {}", cfg.server.addr))?;
    info!("🎯 Dashboard available at: http://{}", cfg.server.addr);

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("🛑 Received Ctrl+C, initiating shutdown...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
        })
        .await
        .context("HTTP server error")?;

    info!("✓ Rail Sentinel shutdown complete");
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    if let Some(SubCommand::History { days }) = &args.command {
        run_history(*days);
        return Ok(());
    }

    config::init(resolve_config(&args)?);
    let cfg = config::get();

    match &args.command {
        Some(SubCommand::Predict {
            vibration,
            temperature,
            window,
        }) => run_predict(cfg, *vibration, *temperature, *window),
        _ => run_server(cfg).await,
    }
}
