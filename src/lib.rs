//! Posture Watch
//!
//! Polls an ESP32 camera over HTTP, classifies each captured frame with a
//! ResNet-101 transfer-learning model, and reports the label back to the
//! device.
//!
//! # Cycle
//!
//! 1. **Capture**: `GET {device}/capture` returns one JPEG.
//! 2. **Classify**: decode, resize to 224x224, normalize, one forward pass,
//!    argmax over the three class scores.
//! 3. **Report**: `POST {device}/classify` with `status=<label>`, then
//!    `GET {device}/timer`.
//! 4. **Sleep** for the cycle interval.
//!
//! Failures in any step are logged and skip the rest of the cycle; only an
//! interrupt ends the loop.
//!
//! # Module Structure
//!
//! - `device`: camera HTTP client (`CameraDevice`, `Esp32Client`)
//! - `preprocess`: image decoding and tensor normalization
//! - `classify`: `Classifier` capability and inference backends
//! - `label`: class labels and logit selection
//! - `runner`: the loop driver and shutdown flag
//! - `config`: file and environment configuration

use std::time::Duration;

pub mod classify;
pub mod config;
pub mod device;
pub mod label;
pub mod preprocess;
pub mod runner;

pub use classify::{Classifier, ClassifyError, LogitsBackend, ModelClassifier, StubBackend};
#[cfg(feature = "backend-tract")]
pub use classify::TractBackend;
pub use config::PostureWatchConfig;
pub use device::{CameraDevice, CaptureError, DeviceReply, Esp32Client, Esp32Config, ReportError};
pub use label::{Label, LABELS};
pub use preprocess::FrameTensor;
pub use runner::{CycleOutcome, LoopState, LoopStats, Runner, RunnerConfig, ShutdownFlag};

/// Device web server the firmware listens on.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.233.37/";

/// Pause between cycles.
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(1);
