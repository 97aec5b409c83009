use super::event::{Event, EventKind};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

/// Aggregation identity: one customer in one hour.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey {
    pub customer_id: String,
    /// Always at the start of an hour.
    pub hour: NaiveDateTime,
}

/// Running totals for one [`BucketKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketAccumulator {
    pub page_loads: u64,
    pub clicks: u64,
    pub unique_click_users: HashSet<String>,
}

impl BucketAccumulator {
    pub fn record_page_load(&mut self) {
        self.page_loads += 1;
    }

    /// A click without a `user_id` still counts as a click.
    pub fn record_click(&mut self, user_id: Option<&str>) {
        self.clicks += 1;
        if let Some(user_id) = user_id {
            self.unique_click_users.insert(user_id.to_string());
        }
    }

    /// Folds one event in. Returns `false` for kinds no metric counts.
    pub fn observe(&mut self, event: &Event) -> bool {
        match event.kind() {
            EventKind::PageLoad => {
                self.record_page_load();
                true
            }
            EventKind::Click => {
                self.record_click(event.user_id.as_deref());
                true
            }
            EventKind::Other => false,
        }
    }
}

/// Final per-bucket output row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub customer_id: String,
    pub hour: NaiveDateTime,
    pub page_loads: u64,
    pub clicks: u64,
    pub unique_user_clicks: u64,
    pub click_through_rate: f64,
}
