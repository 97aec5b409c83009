use crate::models::{BucketKey, Event};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};

/// Truncates to the start of the hour.
pub fn floor_to_hour(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(ts.hour()))
}

/// `None` when the event has no customer to attribute it to.
pub fn bucket_key(event: &Event) -> Option<BucketKey> {
    let customer_id = event.customer_id.clone()?;
    Some(BucketKey {
        customer_id,
        hour: floor_to_hour(event.fired_at),
    })
}
