use super::{Mode, RunSummary};
use crate::sink::TableSink;
use crate::source;
use crate::table::{
    Table, TableName, cleaned_data_batch, failed_data_batch, hourly_aggregates_batch,
};
use common::{Error, Result};
use etl::models::RawRecord;
use etl::processor::{BatchAggregator, RecordValidator};
use std::path::Path;
use tracing::info;

/// Loads the whole file, then cleans, deduplicates and aggregates it.
///
/// Every line must be a JSON object: an unparseable line aborts the run
/// with [`Error::MalformedInput`].
pub async fn run_batch(input: impl AsRef<Path>, sink: &TableSink) -> Result<RunSummary> {
    let input = input.as_ref();
    info!(path = %input.display(), "Loading JSON data");
    let lines = source::read_all(input).await?;
    info!(records = lines.len(), "Loaded records from JSON");

    let mut records = Vec::with_capacity(lines.len());
    for (line_number, line) in &lines {
        let record = RawRecord::parse(line).map_err(|e| Error::MalformedInput {
            line: *line_number,
            reason: e.to_string(),
        })?;
        records.push((*line_number, record));
    }

    info!("Cleaning the data");
    let partition = RecordValidator::new().partition(records);
    let valid = partition.valid.len() as u64;
    info!(
        valid = partition.valid.len(),
        failed = partition.failed.len(),
        "Cleaned data"
    );

    let output = BatchAggregator::new().process(partition.valid);

    let mut tables = sink
        .write_all(&[
            Table::new(TableName::CleanedData, cleaned_data_batch(&output.cleaned)?),
            Table::new(TableName::FailedData, failed_data_batch(&partition.failed)?),
        ])
        .await?;
    tables.push(
        sink.write_table(&Table::new(
            TableName::HourlyAggregates,
            hourly_aggregates_batch(&output.metrics)?,
        ))
        .await?,
    );

    Ok(RunSummary {
        mode: Mode::Batch.to_string(),
        input_lines: lines.len() as u64,
        valid,
        failed: partition.failed.len() as u64,
        duplicates_removed: output.duplicates_removed as u64,
        buckets: output.metrics.len() as u64,
        tables,
    })
}
