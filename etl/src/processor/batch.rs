use super::accumulator::BucketTable;
use super::dedup::drop_duplicates;
use crate::models::{Event, MetricRow};
use tracing::info;

#[derive(Debug)]
pub struct BatchOutput {
    /// Valid events after exact-duplicate removal, in first-seen order.
    pub cleaned: Vec<Event>,
    pub duplicates_removed: usize,
    pub metrics: Vec<MetricRow>,
}

/// Aggregates a fully materialized set of valid events.
pub struct BatchAggregator;

impl BatchAggregator {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, valid: Vec<Event>) -> BatchOutput {
        let (cleaned, duplicates_removed) = drop_duplicates(valid);
        info!(
            unique = cleaned.len(),
            duplicates = duplicates_removed,
            "Removed exact duplicate events"
        );

        let metrics = self.aggregate(&cleaned);
        info!(buckets = metrics.len(), "Metrics calculated successfully");

        BatchOutput {
            cleaned,
            duplicates_removed,
            metrics,
        }
    }

    /// Groups by customer and hour. A bucket appears as soon as it has a page
    /// load or a click; the missing side stays zero.
    pub fn aggregate(&self, events: &[Event]) -> Vec<MetricRow> {
        let mut table = BucketTable::new();
        for event in events {
            table.fold(event);
        }
        table.finalize()
    }
}

impl Default for BatchAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::bucket::floor_to_hour;
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::Map;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn event(event_type: &str, customer: &str, user: &str, fired_at: NaiveDateTime) -> Event {
        Event {
            event_type: event_type.to_string(),
            fired_at,
            customer_id: Some(customer.to_string()),
            user_id: Some(user.to_string()),
            attributes: Map::new(),
            source_identifiers: Map::new(),
        }
    }

    #[test]
    fn test_single_page_load() {
        let rows = BatchAggregator::new().aggregate(&[event("ReferralPageLoad", "C1", "U1", at(10, 15))]);
        assert_eq!(
            rows,
            vec![MetricRow {
                customer_id: "C1".to_string(),
                hour: at(10, 0),
                page_loads: 1,
                clicks: 0,
                unique_user_clicks: 0,
                click_through_rate: 0.0,
            }]
        );
    }

    #[test]
    fn test_click_only_bucket_is_kept_with_zero_page_loads() {
        let rows = BatchAggregator::new().aggregate(&[
            event("ReferralPageLoad", "C1", "U1", at(10, 5)),
            event("ReferralRecommendClick", "C1", "U1", at(11, 5)),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].hour, at(11, 0));
        assert_eq!(rows[1].page_loads, 0);
        assert_eq!(rows[1].clicks, 1);
        assert_eq!(rows[1].click_through_rate, 0.0);
    }

    #[test]
    fn test_output_ignores_input_order() {
        let mut events = vec![
            event("ReferralPageLoad", "C1", "U1", at(10, 5)),
            event("ReferralPageLoad", "C2", "U1", at(10, 7)),
            event("ReferralRecommendClick", "C1", "U2", at(10, 30)),
            event("ReferralRecommendClick", "C1", "U3", at(10, 31)),
            event("ReferralPageLoad", "C1", "U2", at(12, 0)),
        ];
        let aggregator = BatchAggregator::new();
        let forward = aggregator.aggregate(&events);
        events.reverse();
        assert_eq!(aggregator.aggregate(&events), forward);
        assert!(forward.iter().all(|row| floor_to_hour(row.hour) == row.hour));
    }

    #[test]
    fn test_process_removes_exact_duplicates_before_counting() {
        let click = event("ReferralRecommendClick", "C1", "U1", at(10, 15));
        let other_second = event("ReferralRecommendClick", "C1", "U1", at(10, 16));
        let output = BatchAggregator::new().process(vec![
            event("ReferralPageLoad", "C1", "U1", at(10, 0)),
            click.clone(),
            click,
            other_second,
        ]);

        assert_eq!(output.duplicates_removed, 1);
        assert_eq!(output.cleaned.len(), 3);
        assert_eq!(output.metrics.len(), 1);
        let row = &output.metrics[0];
        assert_eq!(row.page_loads, 1);
        assert_eq!(row.clicks, 2);
        assert_eq!(row.unique_user_clicks, 1);
        assert_eq!(row.click_through_rate, 2.0);
    }
}
