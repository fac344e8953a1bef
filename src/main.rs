//! Replays a scripted face capture session and reports the outcome.

use anyhow::{Context, Result};
use clap::Parser;
use face_capture::{
    config::{Config, EXAMPLE_CONFIG},
    orientation::Orientation,
    replay::{run_replay, ReplayScript},
    session::SessionEvent,
};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Replay script (YAML list of frames and oracle yaw readings)
    #[arg(short, long, required_unless_present = "print_example_config")]
    script: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Print an example configuration file and exit
    #[arg(long)]
    print_example_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            match Config::from_file(path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };

    let script_path = args.script.context("--script is required")?;
    let script = ReplayScript::from_file(&script_path)
        .with_context(|| format!("Failed to load replay script {}", script_path.display()))?;
    let base_dir = script_path.parent().unwrap_or_else(|| Path::new("."));

    let report = run_replay(&script, &config, base_dir).context("Replay failed")?;

    for event in &report.events {
        match event {
            SessionEvent::SessionStarted { session_id } => println!("session {session_id} started"),
            SessionEvent::FaceDetected(present) => println!("face detected: {present}"),
            SessionEvent::FrameAccepted {
                orientation,
                instruction,
                image,
            } => println!(
                "captured {orientation} from frame {} ({}px) -> \"{instruction}\"",
                image.source_sequence(),
                image.side()
            ),
            SessionEvent::Finished => println!("session finished"),
        }
    }

    println!();
    println!("instruction: {}", report.snapshot.instruction_text);
    for orientation in Orientation::ALL {
        match report.snapshot.image(orientation) {
            Some(image) => println!("  {orientation:<6} captured {}x{}", image.side(), image.side()),
            None => println!("  {orientation:<6} missing"),
        }
    }
    println!(
        "frames: {} submitted, {} processed, {} superseded, {} accepted, {} released",
        report.stats.submitted,
        report.stats.processed,
        report.stats.superseded,
        report.stats.accepted,
        report.releases
    );

    Ok(())
}
