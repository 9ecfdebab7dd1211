//! Server entrypoint for minivault
//!
//! This is the main binary that wires together all layers using
//! dependency injection: load configuration, select the backend (with
//! the stub fallback policy), open the interaction log, and serve the
//! HTTP API until ctrl-c.

use anyhow::{Context, Result};
use clap::Parser;
use minivault_api::AppState;
use minivault_application::ports::interaction_logger::InteractionLogger;
use minivault_application::ports::telemetry::RequestGauge;
use minivault_application::use_cases::generate_text::GenerateTextUseCase;
use minivault_infrastructure::backends::factory::{BackendSelection, select_backend};
use minivault_infrastructure::config::loader::ConfigLoader;
use minivault_infrastructure::logging::interaction_log::InteractionLog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "minivault", version, about = "Local text-generation gateway")]
struct Cli {
    /// Path to a configuration file (merged over defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Increase diagnostic verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the configuration sources and exit
    #[arg(long)]
    print_config_sources: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if cli.print_config_sources {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let mut config = ConfigLoader::load(cli.config.as_ref())
        .map_err(|e| anyhow::anyhow!(e))
        .context("failed to load configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    info!("Starting minivault");

    // === Dependency Injection ===
    // Select the backend, honoring the fallback policy
    let selection = match config.backend.backend_config() {
        Ok(backend_config) => select_backend(&backend_config, config.backend.fallback_to_stub)
            .context("backend selection failed")?,
        Err(e) if config.backend.fallback_to_stub => BackendSelection::fallback(e),
        Err(e) => return Err(e).context("backend configuration rejected"),
    };
    if let Some(reason) = &selection.fallback_reason {
        warn!("Serving with the stub backend: {}", reason);
    }
    let generator = selection.generator;

    let gauge = RequestGauge::new();
    let log = Arc::new(
        InteractionLog::open(
            &config.log.path,
            generator.kind(),
            generator.model().map(str::to_string),
            Arc::clone(&gauge),
        )
        .context("failed to open interaction log")?,
    );
    let logger: Arc<dyn InteractionLogger> = log.clone();

    let use_case = Arc::new(GenerateTextUseCase::new(
        Arc::clone(&generator),
        logger.clone(),
    ));
    let state = AppState::new(use_case, logger, Arc::clone(&gauge));
    let app = minivault_api::router(state);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    println!("minivault listening on http://{}", addr);
    println!(
        "Using backend: {}{}",
        generator.kind(),
        generator
            .model()
            .map(|m| format!(" ({})", m))
            .unwrap_or_default()
    );
    info!("Interaction log: {}", log.path().display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // Flush the interaction log before exiting; a repeated close during
    // teardown is a no-op.
    if let Err(e) = log.close() {
        warn!("Failed to close interaction log: {}", e);
    }
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
