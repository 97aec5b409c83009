pub mod pipeline;
pub mod sink;
pub mod source;
pub mod storage;
pub mod table;

use common::Result;
use common::config::Settings;
use pipeline::{Mode, RunSummary};
use sink::TableSink;
use tracing::info;

/// Runs one pass over `settings.input.path` and writes its result sets to the
/// configured sink.
pub async fn run_referral_pipeline(mode: Mode, settings: &Settings) -> Result<RunSummary> {
    let storage = storage::build_storage(&settings.sink)?;
    info!(mode = %mode, location = %storage.location(), "Sink ready");

    let sink = TableSink::from_config(storage, &settings.sink);
    pipeline::run(mode, settings, &sink).await
}
