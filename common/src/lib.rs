use arrow::error::ArrowError;
use aws_sdk_s3::primitives::ByteStreamError;
use parquet::errors::ParquetError;
use thiserror::Error;

pub mod config;
pub mod logging;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("ByteStream error: {0}")]
    ByteStream(#[from] ByteStreamError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    #[error("Malformed input at line {line}: {reason}")]
    MalformedInput { line: u64, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
