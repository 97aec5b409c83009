use super::record::{CUSTOMER_ID_FIELD, EVENT_TYPE_FIELD, FIRED_AT_FIELD, RawRecord, USER_ID_FIELD};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::{Map, Value};

/// Fixed, locale-independent layout of `fired_at`, e.g. `01/31/2023, 10:15:00`.
pub const FIRED_AT_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

pub const PAGE_LOAD_EVENT_TYPE: &str = "ReferralPageLoad";
pub const CLICK_EVENT_TYPE: &str = "ReferralRecommendClick";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PageLoad,
    Click,
    /// Valid but not counted by any metric.
    Other,
}

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub event_type: String,
    pub fired_at: NaiveDateTime,
    pub customer_id: Option<String>,
    pub user_id: Option<String>,
    /// Every other field of the source record, kept for the cleaned output
    /// and for exact-duplicate detection.
    pub attributes: Map<String, Value>,
    /// Identifier fields whose source value was not a JSON string, as they
    /// appeared. `customer_id: 42` and `customer_id: "42"` render the same
    /// text but are different records.
    pub source_identifiers: Map<String, Value>,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            PAGE_LOAD_EVENT_TYPE => EventKind::PageLoad,
            CLICK_EVENT_TYPE => EventKind::Click,
            _ => EventKind::Other,
        }
    }

    /// Renders the event back into its raw shape, with `fired_at` in
    /// [`FIRED_AT_FORMAT`].
    pub fn to_raw(&self) -> RawRecord {
        let mut fields = self.attributes.clone();
        fields.insert(
            EVENT_TYPE_FIELD.to_string(),
            Value::String(self.event_type.clone()),
        );
        fields.insert(
            FIRED_AT_FIELD.to_string(),
            Value::String(self.fired_at.format(FIRED_AT_FORMAT).to_string()),
        );
        for (field, identifier) in self.identifiers() {
            if let Some(value) = identifier {
                let source = self
                    .source_identifiers
                    .get(field)
                    .cloned()
                    .unwrap_or_else(|| Value::String(value.to_string()));
                fields.insert(field.to_string(), source);
            }
        }
        RawRecord::from(fields)
    }

    /// `(field name, rendered text)` for `customer_id` then `user_id`.
    pub fn identifiers(&self) -> [(&'static str, Option<&str>); 2] {
        [
            (CUSTOMER_ID_FIELD, self.customer_id.as_deref()),
            (USER_ID_FIELD, self.user_id.as_deref()),
        ]
    }

    /// `true` when the identifier came in as a JSON string (or there was none).
    pub fn identifier_is_text(&self, field: &str) -> bool {
        !self.source_identifiers.contains_key(field)
    }
}
