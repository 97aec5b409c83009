use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "config/referral.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Appends a plain-text copy of the log to this file. Empty disables it.
    #[serde(default = "default_log_file")]
    pub file: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StreamingConfig {
    /// Log a progress line every N consumed lines. Zero disables progress logs.
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
    #[serde(default)]
    pub deduplicate: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkBackend {
    #[default]
    Local,
    S3,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkFormat {
    #[default]
    Parquet,
    Ndjson,
}

impl SinkFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Ndjson => "ndjson",
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SinkConfig {
    #[serde(default)]
    pub backend: SinkBackend,
    #[serde(default)]
    pub format: SinkFormat,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocalConfig {
    #[serde(default = "default_local_root")]
    pub root: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    #[serde(default = "default_s3_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    #[serde(default = "default_s3_bucket")]
    pub bucket: String,
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            json: false,
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            progress_interval: default_progress_interval(),
            deduplicate: false,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            root: default_local_root(),
        }
    }
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: default_s3_endpoint(),
            region: default_s3_region(),
            bucket: default_s3_bucket(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_input_path() -> String {
    "aklamio_challenge.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "app.log".to_string()
}

fn default_progress_interval() -> u64 {
    100
}

fn default_local_root() -> String {
    "output".to_string()
}

fn default_s3_endpoint() -> String {
    "http://localhost:9000".to_string()
}

fn default_s3_region() -> String {
    "us-east-1".to_string()
}

fn default_s3_bucket() -> String {
    "referral".to_string()
}

impl Settings {
    /// Loads settings from an optional TOML file, then `APP_`-prefixed
    /// environment variables (nested keys separated by `__`, e.g.
    /// `APP_SINK__BACKEND=s3`).
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            input = %settings.input.path,
            backend = ?settings.sink.backend,
            format = ?settings.sink.format,
            "Loaded settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::new("does/not/exist/referral").unwrap();
        assert_eq!(settings.input.path, "aklamio_challenge.json");
        assert_eq!(settings.streaming.progress_interval, 100);
        assert!(!settings.streaming.deduplicate);
        assert_eq!(settings.sink.backend, SinkBackend::Local);
        assert_eq!(settings.sink.format, SinkFormat::Parquet);
        assert_eq!(settings.sink.local.root, "output");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("referral.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[input]
path = "events.ndjson"

[streaming]
progress_interval = 5
deduplicate = true

[sink]
backend = "s3"
format = "ndjson"
prefix = "runs/today"

[sink.s3]
bucket = "metrics"
"#
        )
        .unwrap();

        let settings = Settings::new(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.input.path, "events.ndjson");
        assert_eq!(settings.streaming.progress_interval, 5);
        assert!(settings.streaming.deduplicate);
        assert_eq!(settings.sink.backend, SinkBackend::S3);
        assert_eq!(settings.sink.format, SinkFormat::Ndjson);
        assert_eq!(settings.sink.prefix, "runs/today");
        assert_eq!(settings.sink.s3.bucket, "metrics");
        assert_eq!(settings.sink.s3.region, "us-east-1");
        assert_eq!(settings.logging.level, "info");
    }
}
