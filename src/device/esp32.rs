//! ESP32 camera web server client.
//!
//! The device firmware exposes three endpoints under one base URL:
//! - `GET  /capture`  single JPEG snapshot
//! - `POST /classify` form field `status=<label>`
//! - `GET  /timer`    advances the device-side timer, answers with text

use std::io::Read;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use url::Url;

use super::{CameraDevice, CaptureError, DeviceReply, ReportError, MAX_FRAME_BYTES};
use crate::label::Label;

/// Configuration for an ESP32 camera.
#[derive(Clone, Debug)]
pub struct Esp32Config {
    /// Base URL of the device web server.
    pub base_url: String,
    /// Per-request timeout. `None` blocks until the device answers.
    pub timeout: Option<Duration>,
}

impl Default for Esp32Config {
    fn default() -> Self {
        Self {
            base_url: crate::DEFAULT_DEVICE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Blocking HTTP client for the ESP32 camera.
pub struct Esp32Client {
    agent: ureq::Agent,
    capture_url: Url,
    classify_url: Url,
    timer_url: Url,
}

impl Esp32Client {
    pub fn new(config: Esp32Config) -> Result<Self> {
        let base = parse_base_url(&config.base_url)?;
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            agent: builder.build(),
            capture_url: base.join("capture").context("build capture url")?,
            classify_url: base.join("classify").context("build classify url")?,
            timer_url: base.join("timer").context("build timer url")?,
        })
    }

    pub fn capture_url(&self) -> &Url {
        &self.capture_url
    }

    fn reply(
        endpoint: &'static str,
        result: std::result::Result<ureq::Response, ureq::Error>,
    ) -> std::result::Result<DeviceReply, ReportError> {
        // The device answers 4xx with a plain-text reason; surface it instead of failing.
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                return Err(ReportError::Transport {
                    endpoint,
                    reason: transport.to_string(),
                })
            }
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|source| ReportError::Read { endpoint, source })?;
        Ok(DeviceReply { status, body })
    }
}

impl CameraDevice for Esp32Client {
    fn capture(&mut self) -> std::result::Result<Vec<u8>, CaptureError> {
        let response = match self.agent.request_url("GET", &self.capture_url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => return Err(CaptureError::Status(code)),
            Err(ureq::Error::Transport(transport)) => {
                return Err(CaptureError::Transport(transport.to_string()))
            }
        };
        if response.status() != 200 {
            return Err(CaptureError::Status(response.status()));
        }

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_FRAME_BYTES as u64 + 1)
            .read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            return Err(CaptureError::Empty);
        }
        if bytes.len() > MAX_FRAME_BYTES {
            return Err(CaptureError::TooLarge);
        }
        Ok(bytes)
    }

    fn report_classification(
        &mut self,
        label: Label,
    ) -> std::result::Result<DeviceReply, ReportError> {
        let result = self
            .agent
            .request_url("POST", &self.classify_url)
            .send_form(&[("status", label.as_str())]);
        Self::reply("classify", result)
    }

    fn fetch_timer(&mut self) -> std::result::Result<DeviceReply, ReportError> {
        let result = self.agent.request_url("GET", &self.timer_url).call();
        Self::reply("timer", result)
    }
}

/// Parse the device base URL, forcing a trailing slash so endpoints join below it.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim()).with_context(|| format!("parse device url '{}'", raw))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow!(
                "unsupported device scheme '{}'; expected http or https",
                other
            ))
        }
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
