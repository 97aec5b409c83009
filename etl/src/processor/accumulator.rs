use super::bucket::bucket_key;
use super::finalize::finalize;
use crate::models::{BucketAccumulator, BucketKey, Event, EventKind, MetricRow};
use std::collections::HashMap;

/// Per-key accumulators of one run, owned by whichever aggregator built it.
#[derive(Debug, Default, Clone)]
pub struct BucketTable {
    buckets: HashMap<BucketKey, BucketAccumulator>,
}

impl BucketTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a valid event into its bucket. Returns `false`, leaving the
    /// table untouched, when the event has no customer or is a kind no metric
    /// counts.
    pub fn fold(&mut self, event: &Event) -> bool {
        if event.kind() == EventKind::Other {
            return false;
        }
        let Some(key) = bucket_key(event) else {
            return false;
        };
        self.buckets.entry(key).or_default().observe(event)
    }

    pub fn get(&self, key: &BucketKey) -> Option<&BucketAccumulator> {
        self.buckets.get(key)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Rows ordered by customer, then hour.
    pub fn finalize(self) -> Vec<MetricRow> {
        let mut entries: Vec<_> = self.buckets.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        entries
            .into_iter()
            .map(|(key, acc)| finalize(key, acc))
            .collect()
    }
}
