//! posture_watchd - real-time posture classification for an ESP32 camera
//!
//! This daemon:
//! 1. Loads the classification model (fatal on failure)
//! 2. Captures a frame from the device every cycle
//! 3. Classifies it and reports the label back to the device
//! 4. Runs until Ctrl-C

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use posture_watch::{
    Esp32Client, ModelClassifier, PostureWatchConfig, Runner, ShutdownFlag, TractBackend,
};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Classify ESP32 camera frames and report the result to the device"
)]
struct Args {
    /// JSON config file.
    #[arg(long, env = "POSTURE_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the camera web server (overrides config).
    #[arg(long)]
    device_url: Option<String>,

    /// ONNX model path (overrides config).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Pause between cycles in milliseconds (overrides config).
    #[arg(long)]
    interval_ms: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = PostureWatchConfig::load(args.config.as_deref())?;
    if let Some(url) = args.device_url {
        cfg.device_url = url;
    }
    if let Some(model) = args.model {
        cfg.model_path = model;
    }
    if let Some(ms) = args.interval_ms {
        cfg.interval = Duration::from_millis(ms);
    }
    cfg.validate()?;

    let backend = TractBackend::new(&cfg.model_path)?;
    let mut classifier = ModelClassifier::new(backend);
    classifier
        .warm_up()
        .with_context(|| format!("model {} failed warm-up", cfg.model_path.display()))?;
    log::info!(
        "loaded model {} ({} backend)",
        cfg.model_path.display(),
        classifier.backend_name()
    );

    let device = Esp32Client::new(cfg.esp32())?;
    log::info!("polling {} every {:?}", device.capture_url(), cfg.interval);

    let shutdown = ShutdownFlag::new();
    let handler_flag = shutdown.clone();
    ctrlc::set_handler(move || handler_flag.raise()).expect("error setting Ctrl-C handler");

    log::info!("starting real-time classification. press Ctrl-C to stop.");
    let mut runner = Runner::new(device, classifier, cfg.runner());
    let stats = runner.run(&shutdown);
    log::info!(
        "shutdown complete after {} cycles ({} reported)",
        stats.cycles,
        stats.reports_sent
    );
    Ok(())
}
