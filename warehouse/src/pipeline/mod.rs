mod batch;
mod streaming;

pub use batch::run_batch;
pub use streaming::run_streaming;

use crate::sink::TableSink;
use common::Result;
use common::config::Settings;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Batch,
    Stream,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Stream => "stream",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mode: String,
    pub input_lines: u64,
    pub valid: u64,
    pub failed: u64,
    pub duplicates_removed: u64,
    pub buckets: u64,
    /// Object keys written, in write order.
    pub tables: Vec<String>,
}

pub async fn run(mode: Mode, settings: &Settings, sink: &TableSink) -> Result<RunSummary> {
    match mode {
        Mode::Batch => run_batch(&settings.input.path, sink).await,
        Mode::Stream => run_streaming(&settings.input.path, &settings.streaming, sink).await,
    }
}
