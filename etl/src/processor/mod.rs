mod accumulator;
pub mod batch;
pub mod bucket;
pub mod dedup;
pub mod finalize;
pub mod streaming;
pub mod validation;

pub use accumulator::BucketTable;
pub use batch::{BatchAggregator, BatchOutput};
pub use bucket::{bucket_key, floor_to_hour};
pub use dedup::{Deduplicator, drop_duplicates, fingerprint};
pub use finalize::{click_through_rate, finalize};
pub use streaming::{LineOutcome, StreamingAggregator, StreamingOutput, StreamingStats};
pub use validation::{Partition, RecordValidator, parse_fired_at};
