use crate::models::{
    CUSTOMER_ID_FIELD, EVENT_TYPE_FIELD, Event, FIRED_AT_FIELD, FailedRecord, InvalidReason,
    RawRecord, USER_ID_FIELD, ValidationOutcome,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde_json::{Map, Value};

/// Placeholder upstream writes when it has no event type.
pub const EMPTY_EVENT_TYPE_SENTINEL: &str = "EMPTY_VALUE";

// Halves of `FIRED_AT_FORMAT`, split on the literal `", "`.
const FIRED_AT_DATE_FORMAT: &str = "%m/%d/%Y";
const FIRED_AT_TIME_FORMAT: &str = "%H:%M:%S";
const FIRED_AT_SEPARATOR: &str = ", ";

/// Valid events and diverted records of one run.
#[derive(Debug, Default)]
pub struct Partition {
    pub valid: Vec<Event>,
    pub failed: Vec<FailedRecord>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.valid.len() + self.failed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct RecordValidator;

impl RecordValidator {
    pub fn new() -> Self {
        Self
    }

    /// Classifies one record. The event-type check runs first, so a record
    /// failing both checks is reported as `invalid_event_type`.
    pub fn validate(&self, record: RawRecord) -> ValidationOutcome {
        let event_type = match record.get(EVENT_TYPE_FIELD) {
            Some(Value::String(value)) if is_usable_event_type(value) => value.clone(),
            _ => {
                return ValidationOutcome::Invalid {
                    reason: InvalidReason::InvalidEventType,
                    record,
                };
            }
        };

        let fired_at = match record
            .get(FIRED_AT_FIELD)
            .and_then(Value::as_str)
            .and_then(parse_fired_at)
        {
            Some(fired_at) => fired_at,
            None => {
                return ValidationOutcome::Invalid {
                    reason: InvalidReason::InvalidDateFormat,
                    record,
                };
            }
        };

        let customer_id = identifier(record.get(CUSTOMER_ID_FIELD));
        let user_id = identifier(record.get(USER_ID_FIELD));
        let source_identifiers: Map<String, Value> = [CUSTOMER_ID_FIELD, USER_ID_FIELD]
            .into_iter()
            .filter_map(|field| match record.get(field)? {
                Value::Null | Value::String(_) => None,
                other => Some((field.to_string(), other.clone())),
            })
            .collect();

        let mut attributes = record.into_fields();
        for field in [EVENT_TYPE_FIELD, FIRED_AT_FIELD, CUSTOMER_ID_FIELD, USER_ID_FIELD] {
            attributes.remove(field);
        }

        ValidationOutcome::Valid(Event {
            event_type,
            fired_at,
            customer_id,
            user_id,
            attributes,
            source_identifiers,
        })
    }

    /// Splits numbered records into valid events and failed rows, keeping
    /// input order within each side.
    pub fn partition<I>(&self, records: I) -> Partition
    where
        I: IntoIterator<Item = (u64, RawRecord)>,
    {
        let mut partition = Partition::default();
        for (line_number, record) in records {
            match self.validate(record) {
                ValidationOutcome::Valid(event) => partition.valid.push(event),
                ValidationOutcome::Invalid { reason, record } => partition
                    .failed
                    .push(FailedRecord::invalid(reason, record).with_line_number(line_number)),
            }
        }
        partition
    }
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_usable_event_type(value: &str) -> bool {
    !value.is_empty() && value != EMPTY_EVENT_TYPE_SENTINEL
}

/// Parses `MM/DD/YYYY, HH:MM:SS`. Exactly one space follows the comma and no
/// other whitespace is allowed; single-digit month, day and hour are accepted.
pub fn parse_fired_at(value: &str) -> Option<NaiveDateTime> {
    let (date, time) = value.split_once(FIRED_AT_SEPARATOR)?;
    if !is_numeric_field(date, '/') || !is_numeric_field(time, ':') {
        return None;
    }

    let date = NaiveDate::parse_from_str(date, FIRED_AT_DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time, FIRED_AT_TIME_FORMAT).ok()?;
    // chrono reads `:60` as a leap second.
    if time.nanosecond() >= 1_000_000_000 {
        return None;
    }
    Some(date.and_time(time))
}

fn is_numeric_field(part: &str, separator: char) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit() || c == separator)
}

/// Identifiers are opaque: strings pass through, numbers and anything else
/// non-null are rendered as JSON text.
fn identifier(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(value) => Some(value.clone()),
        other => Some(other.to_string()),
    }
}
