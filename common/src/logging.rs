use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

/// Installs the global subscriber: console output plus an optional
/// append-only log file. `RUST_LOG` wins over `logging.level` when set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.json {
        layers.push(fmt::layer().json().boxed());
    } else {
        layers.push(fmt::layer().boxed());
    }

    if !config.file.is_empty() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.file)?;
        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}
