//! Camera device collaborator.
//!
//! The loop driver talks to the camera through `CameraDevice`:
//! - `capture`: fetch one encoded frame
//! - `report_classification`: push the predicted label back to the device
//! - `fetch_timer`: poll the device timer endpoint (reply is only logged)
//!
//! Calls block until the device answers. There are no retries; the next cycle
//! is the retry.

pub mod esp32;

pub use esp32::{Esp32Client, Esp32Config};

use thiserror::Error;

use crate::label::Label;

/// Largest frame accepted from the device.
pub const MAX_FRAME_BYTES: usize = 5 * 1024 * 1024;

/// Why a capture produced no frame.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture endpoint answered HTTP {0}")]
    Status(u16),
    #[error("capture request failed: {0}")]
    Transport(String),
    #[error("capture returned an empty body")]
    Empty,
    #[error("capture body exceeds {} bytes", MAX_FRAME_BYTES)]
    TooLarge,
    #[error("failed to read capture body: {0}")]
    Read(#[from] std::io::Error),
}

/// Network failure while reporting to the device.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{endpoint} request failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },
    #[error("failed to read {endpoint} response: {source}")]
    Read {
        endpoint: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Answer from a report or timer call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceReply {
    pub status: u16,
    pub body: String,
}

impl DeviceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking access to the camera device.
pub trait CameraDevice {
    /// Fetch one encoded frame.
    fn capture(&mut self) -> Result<Vec<u8>, CaptureError>;

    /// Send `status=<label>` to the device.
    fn report_classification(&mut self, label: Label) -> Result<DeviceReply, ReportError>;

    /// Round-trip to the device timer endpoint.
    fn fetch_timer(&mut self) -> Result<DeviceReply, ReportError>;
}
