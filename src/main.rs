//! Replays a tracking session through the parallax window pipeline.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use parallax_window::{
    app::{Recording, ReplayApp},
    config::{Config, EXAMPLE_CONFIG},
    landmarks::FrameSize,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Recorded session to replay (YAML format)
    #[arg(short, long)]
    replay: Option<String>,

    /// Number of synthetic frames to generate when no recording is given
    #[arg(short, long, default_value = "300")]
    synthetic: u64,

    /// Viewport aspect ratio (defaults to the recording's or the screen's)
    #[arg(short, long)]
    aspect: Option<f64>,

    /// Write the example configuration to this path and exit
    #[arg(long)]
    write_config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if let Some(path) = &args.write_config {
        std::fs::write(path, EXAMPLE_CONFIG).with_context(|| format!("writing {path}"))?;
        info!("Example configuration written to {}", path);
        return Ok(());
    }

    let config = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let mut recording = match &args.replay {
        Some(path) => {
            info!("Loading recording from: {}", path);
            Recording::from_file(path)?
        }
        None => {
            info!("No recording given, generating {} synthetic frames", args.synthetic);
            Recording::synthetic(args.synthetic, FrameSize::new(1280, 720))
        }
    };
    if let Some(aspect) = args.aspect {
        recording.aspect = Some(aspect);
    }

    let summary = ReplayApp::new(config, recording)?.run()?;

    let p = summary.final_position;
    info!(
        "Final viewer position ({:.3}, {:.3}, {:.3}) m, status: {}",
        p.x, p.y, p.z, summary.final_status
    );
    if let Some(view) = summary.final_view {
        let f = view.frustum;
        info!(
            "Final frustum l={:.5} r={:.5} b={:.5} t={:.5} n={} f={}",
            f.left, f.right, f.bottom, f.top, f.near, f.far
        );
    }

    Ok(())
}
