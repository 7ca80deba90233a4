use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use tempfile::NamedTempFile;

use posture_watch::config::PostureWatchConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "POSTURE_CONFIG",
        "POSTURE_DEVICE_URL",
        "POSTURE_MODEL_PATH",
        "POSTURE_INTERVAL_MS",
        "POSTURE_HTTP_TIMEOUT_SECS",
        "POSTURE_STATS_INTERVAL_SECS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "device": {
            "url": "http://192.168.4.1",
            "timeout_secs": 8
        },
        "model_path": "models/posture.onnx",
        "interval_ms": 500,
        "stats_interval_secs": 30
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("POSTURE_CONFIG", file.path());
    std::env::set_var("POSTURE_INTERVAL_MS", "2000");
    std::env::set_var("POSTURE_MODEL_PATH", "/opt/models/resnet101.onnx");

    let cfg = PostureWatchConfig::load(None).expect("load config");

    assert_eq!(cfg.device_url, "http://192.168.4.1/");
    assert_eq!(cfg.http_timeout, Some(Duration::from_secs(8)));
    assert_eq!(cfg.model_path, PathBuf::from("/opt/models/resnet101.onnx"));
    assert_eq!(cfg.interval, Duration::from_millis(2000));
    assert_eq!(cfg.stats_interval, Duration::from_secs(30));

    clear_env();
}

#[test]
fn explicit_path_wins_and_defaults_fill_gaps() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, br#"{"interval_ms": 750}"#).expect("write config");

    let cfg = PostureWatchConfig::load(Some(file.path())).expect("load config");
    assert_eq!(cfg.interval, Duration::from_millis(750));
    assert_eq!(cfg.device_url, "http://192.168.233.37/");
    assert_eq!(cfg.model_path, PathBuf::from("resnet101_transfer_learning.onnx"));
    assert!(cfg.http_timeout.is_none());

    clear_env();
}

#[test]
fn rejects_bad_env_values() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("POSTURE_INTERVAL_MS", "soon");
    assert!(PostureWatchConfig::load(None).is_err());
    clear_env();

    std::env::set_var("POSTURE_INTERVAL_MS", "0");
    assert!(PostureWatchConfig::load(None).is_err());
    clear_env();

    std::env::set_var("POSTURE_DEVICE_URL", "ftp://camera");
    assert!(PostureWatchConfig::load(None).is_err());
    clear_env();
}

#[test]
fn zero_http_timeout_is_rejected_from_env_and_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("POSTURE_HTTP_TIMEOUT_SECS", "0");
    let err = PostureWatchConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("http timeout must be greater than zero"));
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    std::io::Write::write_all(&mut file, br#"{"device": {"timeout_secs": 0}}"#)
        .expect("write config");
    let err = PostureWatchConfig::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("http timeout must be greater than zero"));

    std::env::set_var("POSTURE_HTTP_TIMEOUT_SECS", "15");
    let cfg = PostureWatchConfig::load(Some(file.path())).expect("env overrides file");
    assert_eq!(cfg.http_timeout, Some(Duration::from_secs(15)));
    clear_env();
}

#[test]
fn missing_config_file_is_an_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let err = PostureWatchConfig::load(Some(std::path::Path::new("/nonexistent/posture.json")))
        .unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
