//! TerraGenesis - land regeneration analysis and planning
//!
//! # Usage
//!
//! ```bash
//! # Analyze a site and print {coordinates, analysis, plan} as JSON
//! terragenesis --lat -1.2921 --lng 36.8219
//!
//! # Plan from an existing analysis record
//! echo '{"ndvi": 0.1, "erosion_risk": 0.6}' | terragenesis plan
//!
//! # Run the HTTP service
//! terragenesis serve --addr 127.0.0.1:3000
//! ```
//!
//! # Environment Variables
//!
//! - `TERRAGENESIS_CONFIG`: Path to a TOML config file (same as `--config`)
//! - `TERRAGENESIS_ADDR`: Server bind address for `serve` (same as `--addr`)
//! - `RUST_LOG`: Logging filter (default: info for `serve`, warn otherwise)

use std::io::{Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use terragenesis::api::{create_app, ApiState};
use terragenesis::{
    AnalysisResult, Coordinates, LandParcel, PlanPipeline, PlanStorage, RegenerationPlanner,
    TerraConfig,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "terragenesis")]
#[command(about = "TerraGenesis land regeneration analysis and planning")]
#[command(version)]
struct CliArgs {
    /// Latitude of the site centre
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the site centre
    #[arg(long, allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Path to a TOML config file
    #[arg(long, global = true, env = "TERRAGENESIS_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the HTTP service
    Serve {
        /// Bind address (default: server.addr from config)
        #[arg(long, env = "TERRAGENESIS_ADDR")]
        addr: Option<String>,
    },

    /// Generate a plan from an analysis JSON record (file or stdin)
    Plan {
        /// Analysis JSON file; reads stdin when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Print the most recently stored plans, or one plan by id
    History {
        /// Number of records (default: storage.recent_plans_limit)
        #[arg(long, conflicts_with = "id")]
        limit: Option<usize>,

        /// Print only the plan with this id
        #[arg(long)]
        id: Option<u64>,
    },

    /// Register or update a land parcel
    AddParcel {
        #[arg(long)]
        id: u64,
        /// Degradation label, e.g. "severe"
        #[arg(long)]
        degradation_level: Option<String>,
    },

    /// Print the effective configuration as TOML
    Config,
}

// ============================================================================
// Logging
// ============================================================================

/// Logs go to stderr so stdout carries only command output.
fn init_logging(json: bool, default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, value).context("Failed to write JSON output")?;
    writeln!(out)?;
    Ok(())
}

// ============================================================================
// One-Shot Commands
// ============================================================================

/// Default command: analyze the placeholder tile and print the full report.
fn run_analysis(config: &TerraConfig, coordinates: Coordinates) -> Result<()> {
    // Coordinates do not select a tile until a raster backend exists
    let pipeline = PlanPipeline::from_config(config);
    let report = pipeline.run(coordinates).context("Tile analysis failed")?;
    print_json(&report)
}

fn run_plan(config: &TerraConfig, input: Option<PathBuf>) -> Result<()> {
    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read analysis from stdin")?;
            buf
        }
    };

    let analysis: AnalysisResult =
        serde_json::from_str(&raw).context("Input is not a valid analysis record")?;
    let plan = RegenerationPlanner::new(config.planning.clone()).generate(&analysis);
    print_json(&plan)
}

fn open_storage(config: &TerraConfig) -> Result<PlanStorage> {
    PlanStorage::open(&config.storage.path).with_context(|| {
        format!(
            "Failed to open plan storage at {}",
            config.storage.path.display()
        )
    })
}

fn run_history(config: &TerraConfig, limit: Option<usize>, id: Option<u64>) -> Result<()> {
    let storage = open_storage(config)?;

    if let Some(id) = id {
        let Some(record) = storage.get_plan(id)? else {
            bail!("No regeneration plan with id {id}");
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let records = storage.recent_plans(limit.unwrap_or(config.storage.recent_plans_limit))?;

    if records.is_empty() {
        println!("No regeneration plans stored.");
        return Ok(());
    }

    let pretty = serde_json::to_string_pretty(&records)?;
    println!("{pretty}");
    Ok(())
}

fn run_add_parcel(config: &TerraConfig, id: u64, degradation_level: Option<String>) -> Result<()> {
    let storage = open_storage(config)?;
    let parcel = LandParcel {
        id,
        degradation_level,
    };
    storage.upsert_parcel(&parcel)?;
    storage.flush()?;
    print_json(&parcel)
}

// ============================================================================
// HTTP Service
// ============================================================================

/// Resolves on Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

async fn serve(config: TerraConfig, addr: String) -> Result<()> {
    // The service starts without a database; /health then reports it unreachable
    let storage = match PlanStorage::open(&config.storage.path) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(
                path = %config.storage.path.display(),
                error = %e,
                "Plan storage unavailable, plans will not be persisted"
            );
            None
        }
    };

    let state = ApiState::new(config, storage.clone());
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("HTTP server listening on {}", addr);

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!("Shutdown signal received, stopping server...");
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel_token.cancelled().await })
        .await
        .context("HTTP server error")?;

    if let Some(storage) = storage {
        if let Err(e) = storage.flush() {
            warn!(error = %e, "Failed to flush plan storage on shutdown");
        }
    }

    info!("TerraGenesis shutdown complete");
    Ok(())
}

// ============================================================================
// Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Coordinates only feed the one-shot analysis
    if args.command.is_some() && (args.lat.is_some() || args.lng.is_some()) {
        CliArgs::command()
            .error(
                ErrorKind::ArgumentConflict,
                "--lat/--lng cannot be combined with a subcommand",
            )
            .exit();
    }

    let default_filter = match args.command {
        Some(SubCommand::Serve { .. }) => "info",
        _ => "warn",
    };
    init_logging(args.log_json, default_filter);

    let config = TerraConfig::load(args.config.as_deref()).context("Failed to load configuration")?;

    match args.command {
        None => run_analysis(&config, Coordinates::new(args.lat, args.lng)),
        Some(SubCommand::Plan { input }) => run_plan(&config, input),
        Some(SubCommand::History { limit, id }) => run_history(&config, limit, id),
        Some(SubCommand::AddParcel {
            id,
            degradation_level,
        }) => run_add_parcel(&config, id, degradation_level),
        Some(SubCommand::Config) => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Some(SubCommand::Serve { addr }) => {
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
            runtime.block_on(serve(config, addr))
        }
    }
}
