use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::device::esp32::parse_base_url;
use crate::device::Esp32Config;
use crate::runner::RunnerConfig;

const DEFAULT_MODEL_PATH: &str = "resnet101_transfer_learning.onnx";
const DEFAULT_INTERVAL_MS: u64 = 1_000;
const DEFAULT_STATS_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct PostureWatchConfigFile {
    device: Option<DeviceConfigFile>,
    model_path: Option<PathBuf>,
    interval_ms: Option<u64>,
    stats_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct DeviceConfigFile {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct PostureWatchConfig {
    pub device_url: String,
    pub http_timeout: Option<Duration>,
    pub model_path: PathBuf,
    pub interval: Duration,
    pub stats_interval: Duration,
}

impl Default for PostureWatchConfig {
    fn default() -> Self {
        Self {
            device_url: crate::DEFAULT_DEVICE_URL.to_string(),
            http_timeout: None,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            stats_interval: Duration::from_secs(DEFAULT_STATS_INTERVAL_SECS),
        }
    }
}

impl PostureWatchConfig {
    /// Defaults, then the optional JSON file, then environment overrides.
    ///
    /// The file path is `path` when given, else `POSTURE_CONFIG`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("POSTURE_CONFIG").ok().map(PathBuf::from));
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(path)?,
            None => PostureWatchConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: PostureWatchConfigFile) -> Self {
        let defaults = Self::default();
        let device = file.device.unwrap_or_default();
        Self {
            device_url: device.url.unwrap_or(defaults.device_url),
            http_timeout: device.timeout_secs.map(Duration::from_secs),
            model_path: file.model_path.unwrap_or(defaults.model_path),
            interval: file
                .interval_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.interval),
            stats_interval: file
                .stats_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.stats_interval),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var("POSTURE_DEVICE_URL") {
            if !url.trim().is_empty() {
                self.device_url = url;
            }
        }
        if let Ok(path) = std::env::var("POSTURE_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.model_path = PathBuf::from(path);
            }
        }
        if let Ok(interval) = std::env::var("POSTURE_INTERVAL_MS") {
            let ms: u64 = interval
                .parse()
                .map_err(|_| anyhow!("POSTURE_INTERVAL_MS must be an integer number of milliseconds"))?;
            self.interval = Duration::from_millis(ms);
        }
        if let Ok(timeout) = std::env::var("POSTURE_HTTP_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().map_err(|_| {
                anyhow!("POSTURE_HTTP_TIMEOUT_SECS must be an integer number of seconds")
            })?;
            self.http_timeout = Some(Duration::from_secs(secs));
        }
        if let Ok(stats) = std::env::var("POSTURE_STATS_INTERVAL_SECS") {
            let secs: u64 = stats.parse().map_err(|_| {
                anyhow!("POSTURE_STATS_INTERVAL_SECS must be an integer number of seconds")
            })?;
            self.stats_interval = Duration::from_secs(secs);
        }
        Ok(())
    }

    /// Check values and normalize the device URL.
    pub fn validate(&mut self) -> Result<()> {
        self.device_url = parse_base_url(&self.device_url)?.to_string();
        if self.interval.is_zero() {
            return Err(anyhow!("cycle interval must be greater than zero"));
        }
        if self.http_timeout.is_some_and(|t| t.is_zero()) {
            return Err(anyhow!("http timeout must be greater than zero"));
        }
        if self.model_path.as_os_str().is_empty() {
            return Err(anyhow!("model path must not be empty"));
        }
        Ok(())
    }

    pub fn esp32(&self) -> Esp32Config {
        Esp32Config {
            base_url: self.device_url.clone(),
            timeout: self.http_timeout,
        }
    }

    pub fn runner(&self) -> RunnerConfig {
        RunnerConfig {
            interval: self.interval,
            stats_interval: self.stats_interval,
        }
    }
}

fn read_config_file(path: &Path) -> Result<PostureWatchConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
