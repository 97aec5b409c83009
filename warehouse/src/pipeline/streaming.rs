use super::{Mode, RunSummary};
use crate::sink::TableSink;
use crate::source::LineSource;
use crate::table::{Table, TableName, failed_data_batch, hourly_aggregates_batch};
use common::Result;
use common::config::StreamingConfig;
use etl::processor::{LineOutcome, StreamingAggregator};
use std::path::Path;
use tracing::{error, info};

/// Consumes the file line by line, folding each valid event as it arrives.
pub async fn run_streaming(
    input: impl AsRef<Path>,
    config: &StreamingConfig,
    sink: &TableSink,
) -> Result<RunSummary> {
    let input = input.as_ref();
    info!(path = %input.display(), deduplicate = config.deduplicate, "Streaming JSON data");
    let mut source = LineSource::open(input).await?;

    let mut aggregator = StreamingAggregator::new();
    if config.deduplicate {
        aggregator = aggregator.with_deduplication();
    }

    while let Some((line_number, line)) = source.next_line().await? {
        if let LineOutcome::Malformed(reason) = aggregator.ingest(line_number, &line) {
            error!(line_number, line = line.trim(), %reason, "Failed to process line");
        }

        let consumed = aggregator.consumed();
        if config.progress_interval > 0 && consumed % config.progress_interval == 0 {
            info!(lines = consumed, "Processed lines");
        }
    }

    let output = aggregator.finish();
    info!(
        lines = output.stats.consumed,
        valid = output.stats.valid,
        failed = output.stats.failed,
        buckets = output.metrics.len(),
        "Feed exhausted"
    );

    let tables = sink
        .write_all(&[
            Table::new(
                TableName::HourlyAggregates,
                hourly_aggregates_batch(&output.metrics)?,
            ),
            Table::new(TableName::FailedData, failed_data_batch(&output.failed)?),
        ])
        .await?;

    info!("Streaming data processing completed successfully");

    Ok(RunSummary {
        mode: Mode::Stream.to_string(),
        input_lines: output.stats.consumed,
        valid: output.stats.valid,
        failed: output.stats.failed,
        duplicates_removed: output.stats.duplicates_skipped,
        buckets: output.metrics.len() as u64,
        tables,
    })
}
