// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/sentra

//! Sentra - Personal Safety Monitoring Agent
//!
//! Demo entry point: activates a sample profile, runs a short monitoring
//! window against simulated sensors, and prints the final session status.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sentra::{
    Config, EventBus, LogDispatcher, Orchestrator, SafetyProfile, SafeZone, SimulatedProvider,
    VERSION,
};

/// Sentra - Personal Safety Monitoring Agent
#[derive(Parser, Debug)]
#[command(name = "sentra")]
#[command(author = "Sentra Project")]
#[command(version = VERSION)]
#[command(about = "Sensor fusion and emergency escalation for personal safety")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Monitoring window in seconds
    #[arg(short = 'd', long, default_value = "10")]
    duration: u64,

    /// Fire a manual alert at the end of the window
    #[arg(long)]
    manual_alert: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Sentra v{} - Personal Safety Monitoring Agent", VERSION);

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_create(&config_path)?;
    info!("Configuration loaded from {:?}", config_path);

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_demo(config, args.duration, args.manual_alert))
}

/// Run a short monitoring session against simulated sensors
async fn run_demo(config: Config, duration_secs: u64, manual_alert: bool) -> Result<()> {
    let profile = SafetyProfile::new("Priya Sharma", "+91-9876543210")
        .with_contact("Mom", "+91-9123456789")
        .with_contact("Police", "100")
        .with_contact("Friend", "+91-9111111111")
        .with_safe_zone(SafeZone::new("Home", 28.6139, 77.2090, 750.0));

    let provider = SimulatedProvider::new(config.sensors.clone(), 28.6139, 77.2090);
    let orchestrator = Orchestrator::new(
        &config,
        Box::new(provider),
        Arc::new(LogDispatcher),
        Arc::new(EventBus::default()),
    );

    if !orchestrator.activate(profile).await {
        anyhow::bail!("failed to activate agent");
    }

    orchestrator
        .monitor(Duration::from_secs(duration_secs))
        .await;

    if manual_alert {
        orchestrator.manual_alert().await;
    }

    for incident in orchestrator.incidents().await {
        info!("Incident record: {}", serde_json::to_string(&incident)?);
    }

    let status = orchestrator.get_status().await;
    info!("Final status: {}", serde_json::to_string(&status)?);

    orchestrator.deactivate().await;
    Ok(())
}
