//! Application entry point for the GrowF viewer.
//!
//! This binary parses the command line, loads the growth configuration and
//! delegates all interactive logic and rendering to [`Viewer`].

mod viewer;

use std::path::PathBuf;

use clap::Parser;
use grow_core::GrowthConfig;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML growth configuration; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of growth steps to run before the window opens
    #[arg(short, long)]
    steps: Option<usize>,
}

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the configuration is invalid, the initial growth fails, or
///   eframe fails to create the native window or event loop.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => GrowthConfig::load(path)?,
        None => GrowthConfig::default(),
    };
    if let Some(steps) = args.steps {
        cfg.steps = steps;
    }
    tracing::info!(seed = %cfg.seed, steps = cfg.steps, "starting viewer");

    let viewer = Viewer::new(cfg)?;
    eframe::run_native(
        "GrowF",
        eframe::NativeOptions::default(),
        Box::new(move |_cc| Ok(Box::new(viewer))),
    )?;
    Ok(())
}
