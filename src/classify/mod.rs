//! Frame classification.
//!
//! A `Classifier` maps encoded frame bytes to a `Label`. The model-backed
//! implementation (`ModelClassifier`) composes the fixed preprocessing
//! pipeline with a `LogitsBackend` that runs the network.

mod backend;
mod backends;
mod classifier;

pub use backend::LogitsBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use classifier::{Classifier, ModelClassifier};

use thiserror::Error;

/// Recoverable per-frame classification failure.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("failed to decode frame: {0}")]
    Decode(#[source] image::ImageError),
    #[error("inference failed: {0:#}")]
    Inference(anyhow::Error),
    #[error("predicted index {} is out of range for {logits} logits", display_index(.index))]
    OutOfRange {
        index: Option<usize>,
        logits: usize,
    },
}

fn display_index(index: &Option<usize>) -> String {
    match index {
        Some(index) => index.to_string(),
        None => "<none>".to_string(),
    }
}
