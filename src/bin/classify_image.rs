//! classify_image - run the posture model on local image files.
//!
//! Uses the same preprocessing and model as posture_watchd, without a device.
//! Prints `<path>: <label>` per file; files that fail are reported and skipped.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use posture_watch::{Classifier, ModelClassifier, TractBackend};

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify local images with the posture model")]
struct Args {
    /// ONNX model path.
    #[arg(
        long,
        env = "POSTURE_MODEL_PATH",
        default_value = "resnet101_transfer_learning.onnx"
    )]
    model: PathBuf,

    /// Images to classify (JPEG or PNG).
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut classifier = ModelClassifier::new(TractBackend::new(&args.model)?);

    let mut failures = 0usize;
    for path in &args.images {
        let bytes = match std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))
        {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("{:#}", err);
                failures += 1;
                continue;
            }
        };
        match classifier.classify(&bytes) {
            Ok(label) => println!("{}: {}", path.display(), label),
            Err(err) => {
                log::warn!("{}: {}", path.display(), err);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} of {} images failed", failures, args.images.len()));
    }
    Ok(())
}
