//! UDP listener for Vicon motion-capture frames.
//!
//! Binds the tracker, polls it continuously and prints the drone's pose
//! relative to its takeoff point on every decoded frame.
//!
//! Usage:
//!   vicon_receiver --bind 0.0.0.0 --port 51001 [--json]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vicon_receiver::{PollOutcome, PoseTracker, TrackerConfig};

/// Receive Vicon frames and print the tracked pose relative to takeoff.
#[derive(Parser)]
#[command(name = "vicon_receiver", version)]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// IP address to bind the UDP listener to.
    #[arg(long)]
    bind: Option<String>,

    /// UDP port.
    #[arg(long)]
    port: Option<u16>,

    /// Max wait per poll in milliseconds (0 = non-blocking).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print each relative pose as a JSON line.
    #[arg(long)]
    json: bool,

    /// Log every decoded frame.
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn tracker_config(&self) -> Result<TrackerConfig> {
        let mut config = match &self.config {
            Some(path) => TrackerConfig::from_json_file(path)?,
            None => TrackerConfig::default(),
        };
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.poll_timeout_ms = timeout_ms;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = cli.tracker_config()?;
    let mut tracker = PoseTracker::with_config(&config)
        .with_context(|| format!("starting tracker on {}:{}", config.bind_addr, config.port))?;
    info!(addr = %tracker.local_addr(), "[RUN] waiting for frames");

    loop {
        match tracker.poll() {
            PollOutcome::NoData => {}
            PollOutcome::Updated(rel) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&rel)?);
                } else {
                    println!(
                        "X={:+.2} Y={:+.2} Z={:+.2} Roll={:+.2} Pitch={:+.2} Yaw={:+.2}",
                        rel.x, rel.y, rel.z, rel.roll, rel.pitch, rel.yaw
                    );
                }
            }
            PollOutcome::DecodeFailed(e) => warn!(error = %e, "frame dropped"),
            PollOutcome::SocketError(e) => {
                error!(error = %e, frames = tracker.frame_count(), "tracking stopped");
                tracker.close();
                return Err(e).context("receiving motion-capture frames");
            }
        }
    }
}
