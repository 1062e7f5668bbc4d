use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use mm_monitor::{
    api::rest::{AppState, create_router},
    application::scheduler::UpdateScheduler,
    config::{AppConfig, DEFAULT_CONFIG_FILE},
    domain::services::rating_engine::RatingEngine,
    infrastructure::{broadcast_sink::BroadcastSink, roster::SimulatedMetricsSource},
    telemetry::init_tracing,
};

/// Market maker monitoring backend.
#[derive(Debug, Parser)]
#[command(name = "mm-monitor", version, about)]
struct Args {
    /// Configuration file.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Listen address, overrides `server.bind_addr`.
    #[arg(long)]
    bind: Option<String>,

    /// Emit JSON logs, overrides `logging.json`.
    #[arg(long)]
    json: bool,
}

/// Builds the scheduler over the simulated roster.
fn build_scheduler(cfg: &AppConfig) -> UpdateScheduler {
    let engine = RatingEngine::new(cfg.rating.reference_year(), cfg.rating.random_source());
    UpdateScheduler::new(
        cfg.scheduler_settings(),
        Arc::new(SimulatedMetricsSource::with_base_roster()),
        engine,
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut cfg = AppConfig::load_from(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        cfg.server.bind_addr = bind;
    }

    init_tracing(args.json || cfg.logging.json);
    tracing::info!(
        bind_addr = %cfg.server.bind_addr,
        seed = ?cfg.rating.seed,
        reference_year = cfg.rating.reference_year(),
        "starting mm-monitor"
    );

    let scheduler = build_scheduler(&cfg);
    let state = Arc::new(AppState::new(scheduler.clone(), BroadcastSink::default()));
    scheduler.start().await;

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind_addr))?;
    tracing::info!(addr = %cfg.server.bind_addr, "http server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;

    scheduler.stop();
    tracing::info!("mm-monitor stopped");
    Ok(())
}
