use super::accumulator::BucketTable;
use super::dedup::Deduplicator;
use super::validation::RecordValidator;
use crate::models::{FailedRecord, InvalidReason, MetricRow, RawRecord, ValidationOutcome};
use tracing::debug;

/// What happened to one consumed line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Folded,
    /// Valid, but neither a page load nor a click, or missing a customer.
    Uncounted,
    /// Valid, and already seen. Only with deduplication enabled.
    Duplicate,
    Invalid(InvalidReason),
    Malformed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamingStats {
    pub consumed: u64,
    pub valid: u64,
    pub failed: u64,
    pub duplicates_skipped: u64,
}

#[derive(Debug)]
pub struct StreamingOutput {
    pub metrics: Vec<MetricRow>,
    pub failed: Vec<FailedRecord>,
    pub stats: StreamingStats,
}

/// Folds a line feed into bucket accumulators one line at a time.
///
/// Exact duplicates are counted twice unless [`with_deduplication`] is set.
///
/// [`with_deduplication`]: StreamingAggregator::with_deduplication
pub struct StreamingAggregator {
    validator: RecordValidator,
    buckets: BucketTable,
    failed: Vec<FailedRecord>,
    dedup: Option<Deduplicator>,
    stats: StreamingStats,
}

impl StreamingAggregator {
    pub fn new() -> Self {
        Self {
            validator: RecordValidator::new(),
            buckets: BucketTable::new(),
            failed: Vec::new(),
            dedup: None,
            stats: StreamingStats::default(),
        }
    }

    pub fn with_deduplication(mut self) -> Self {
        self.dedup = Some(Deduplicator::new());
        self
    }

    /// Consumes one line. Never fails: bad lines go to the failed list.
    pub fn ingest(&mut self, line_number: u64, line: &str) -> LineOutcome {
        self.stats.consumed += 1;

        let record = match RawRecord::parse(line) {
            Ok(record) => record,
            Err(e) => {
                let detail = e.to_string();
                self.failed
                    .push(FailedRecord::malformed(line_number, line.trim_end(), detail.clone()));
                self.stats.failed += 1;
                return LineOutcome::Malformed(detail);
            }
        };

        match self.validator.validate(record) {
            ValidationOutcome::Invalid { reason, record } => {
                debug!(line_number, %reason, "Diverting invalid record");
                self.failed
                    .push(FailedRecord::invalid(reason, record).with_line_number(line_number));
                self.stats.failed += 1;
                LineOutcome::Invalid(reason)
            }
            ValidationOutcome::Valid(event) => {
                self.stats.valid += 1;
                if let Some(dedup) = self.dedup.as_mut() {
                    if !dedup.is_first(&event) {
                        self.stats.duplicates_skipped += 1;
                        return LineOutcome::Duplicate;
                    }
                }
                if self.buckets.fold(&event) {
                    LineOutcome::Folded
                } else {
                    LineOutcome::Uncounted
                }
            }
        }
    }

    pub fn consumed(&self) -> u64 {
        self.stats.consumed
    }

    pub fn stats(&self) -> StreamingStats {
        self.stats
    }

    pub fn failed(&self) -> &[FailedRecord] {
        &self.failed
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Rows for everything folded so far, leaving the run open.
    pub fn snapshot(&self) -> Vec<MetricRow> {
        self.buckets.clone().finalize()
    }

    pub fn finish(self) -> StreamingOutput {
        StreamingOutput {
            metrics: self.buckets.finalize(),
            failed: self.failed,
            stats: self.stats,
        }
    }
}

impl Default for StreamingAggregator {
    fn default() -> Self {
        Self::new()
    }
}
