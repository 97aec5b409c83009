use crate::models::{BucketAccumulator, BucketKey, MetricRow};

/// `clicks / page_loads`, or exactly `0.0` for a bucket without page loads.
pub fn click_through_rate(clicks: u64, page_loads: u64) -> f64 {
    if page_loads == 0 {
        return 0.0;
    }
    clicks as f64 / page_loads as f64
}

/// Turns one accumulator into its output row. Both aggregators finish here.
pub fn finalize(key: BucketKey, acc: BucketAccumulator) -> MetricRow {
    MetricRow {
        customer_id: key.customer_id,
        hour: key.hour,
        page_loads: acc.page_loads,
        clicks: acc.clicks,
        unique_user_clicks: acc.unique_click_users.len() as u64,
        click_through_rate: click_through_rate(acc.clicks, acc.page_loads),
    }
}
