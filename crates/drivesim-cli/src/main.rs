//! `drivesim` - terminal dashboard for DriveSim telemetry
//!
//! Connects to the rig's telemetry endpoint (or the built-in demo device) and
//! renders dashboard updates to the log, or as JSON lines on stdout.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use drivesim_core::dashboard::safe_zoom;
use drivesim_core::prelude::*;
use drivesim_core::protocol::encode_hex;
use drivesim_core::transport;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "drivesim", version, about = "DriveSim telemetry dashboard")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Telemetry address: ws://host:port/path for the rig, or host:port for
    /// a line bridge; overrides the config file
    #[arg(short, long)]
    address: Option<String>,

    /// Use the simulated device instead of connecting
    #[arg(long)]
    demo: bool,

    /// Frame period of the simulated device
    #[arg(long, default_value_t = 100)]
    demo_interval_ms: u64,

    /// Write dashboard updates to stdout as JSON lines
    #[arg(long)]
    json: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    write_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(DashboardConfig::default_path);
    let mut config = DashboardConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(address) = &cli.address {
        config.transport.address = address.clone();
    }
    config.validate().context("invalid configuration")?;

    if cli.write_config {
        config
            .save(&config_path)
            .with_context(|| format!("writing config to {}", config_path.display()))?;
        tracing::info!(path = %config_path.display(), "Configuration written");
        return Ok(());
    }

    if cli.demo_interval_ms == 0 {
        bail!("--demo-interval-ms must be positive");
    }

    tracing::info!(
        version = drivesim_core::VERSION,
        zoom = safe_zoom(MAX_TILT_DEG),
        "Starting dashboard"
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
        }
        ctrl_c.cancel();
    });

    let source: Box<dyn TransportSource> = if cli.demo {
        Box::new(spawn_demo(
            Duration::from_millis(cli.demo_interval_ms),
            cancel.clone(),
        ))
    } else {
        transport::connect(&config.transport)
            .await
            .with_context(|| format!("connecting to {}", config.transport.address))?
    };

    let stats = if cli.json {
        let mut pipeline = Pipeline::new(JsonLinesSink::new(io::stdout()), &config);
        pipeline.run(source, cancel).await
    } else {
        let mut pipeline = Pipeline::new(TracingSink, &config);
        pipeline.run(source, cancel).await
    };

    tracing::info!(
        frames = stats.frames_applied,
        commands = stats.commands_applied,
        dropped = stats.frames_dropped,
        ticks = stats.ticks,
        "Dashboard stopped"
    );
    Ok(())
}

/// Feed hex frames from a simulated device into a channel source
fn spawn_demo(period: Duration, cancel: CancellationToken) -> ChannelSource {
    let (tx, source) = ChannelSource::channel(16);

    tokio::spawn(async move {
        let mut device = DemoDevice::new();
        let mut ticker = tokio::time::interval(period);
        let start = Instant::now();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let frame = device.update(start.elapsed().as_millis() as u64);
                    if tx.send(TransportMessage::Text(encode_hex(&frame))).await.is_err() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Demo device stopped");
    });

    source
}
