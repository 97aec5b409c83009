mod event;
mod metric;
mod outcome;
mod record;

pub use event::{CLICK_EVENT_TYPE, Event, EventKind, FIRED_AT_FORMAT, PAGE_LOAD_EVENT_TYPE};
pub use metric::{BucketAccumulator, BucketKey, MetricRow};
pub use outcome::{FailedRecord, InvalidReason, ValidationOutcome};
pub use record::{CUSTOMER_ID_FIELD, EVENT_TYPE_FIELD, FIRED_AT_FIELD, RawRecord, USER_ID_FIELD};
