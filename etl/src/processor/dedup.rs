use crate::models::Event;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashSet;

const FIELD_SEPARATOR: u8 = 0x1f;

/// SHA-256 over every retained field of the event. Two events share a
/// fingerprint exactly when all their fields are equal.
pub fn fingerprint(event: &Event) -> String {
    let mut hasher = Sha256::new();
    hasher.update(event.event_type.as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    hasher.update(event.fired_at.to_string().as_bytes());
    hasher.update([FIELD_SEPARATOR]);
    for (field, identifier) in event.identifiers() {
        match identifier {
            Some(value) => {
                let tag = if event.identifier_is_text(field) { b's' } else { b'j' };
                hasher.update([1u8, tag]);
                hasher.update(value.as_bytes());
            }
            None => hasher.update([0u8]),
        }
        hasher.update([FIELD_SEPARATOR]);
    }
    // Map iterates in key order, so the rendering is canonical.
    hasher.update(Value::Object(event.attributes.clone()).to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Remembers fingerprints of events already seen.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` the first time an event is offered.
    pub fn is_first(&mut self, event: &Event) -> bool {
        self.seen.insert(fingerprint(event))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Drops exact duplicates, keeping first occurrences in input order.
/// Returns the survivors and how many were dropped.
pub fn drop_duplicates(events: Vec<Event>) -> (Vec<Event>, usize) {
    let total = events.len();
    let mut dedup = Deduplicator::new();
    let unique: Vec<Event> = events
        .into_iter()
        .filter(|event| dedup.is_first(event))
        .collect();
    let dropped = total - unique.len();
    (unique, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawRecord, ValidationOutcome};
    use crate::processor::validation::RecordValidator;
    use chrono::NaiveDate;
    use serde_json::{Map, json};

    fn click(user: Option<&str>) -> Event {
        Event {
            event_type: "ReferralRecommendClick".to_string(),
            fired_at: NaiveDate::from_ymd_opt(2023, 1, 1)
                .unwrap()
                .and_hms_opt(10, 15, 0)
                .unwrap(),
            customer_id: Some("C1".to_string()),
            user_id: user.map(str::to_string),
            attributes: Map::new(),
            source_identifiers: Map::new(),
        }
    }

    #[test]
    fn test_identical_events_share_fingerprint() {
        assert_eq!(fingerprint(&click(Some("U1"))), fingerprint(&click(Some("U1"))));
    }

    #[test]
    fn test_any_field_difference_changes_fingerprint() {
        let base = click(Some("U1"));

        let mut other_time = base.clone();
        other_time.fired_at += chrono::Duration::seconds(1);

        let mut with_attribute = base.clone();
        with_attribute.attributes.insert("campaign".into(), json!("spring"));

        let missing_user = click(None);
        let empty_user = click(Some(""));

        let prints: HashSet<String> = [&base, &other_time, &with_attribute, &missing_user, &empty_user]
            .into_iter()
            .map(fingerprint)
            .collect();
        assert_eq!(prints.len(), 5);
    }

    #[test]
    fn test_numeric_and_string_identifiers_are_distinct() {
        let validator = RecordValidator::new();
        let events: Vec<Event> = [json!(42), json!("42")]
            .into_iter()
            .map(|customer_id| {
                let fields = json!({
                    "event_type": "ReferralPageLoad",
                    "fired_at": "01/01/2023, 10:15:00",
                    "customer_id": customer_id,
                    "user_id": "U1"
                });
                let Value::Object(fields) = fields else {
                    unreachable!()
                };
                match validator.validate(RawRecord::from(fields)) {
                    ValidationOutcome::Valid(event) => event,
                    ValidationOutcome::Invalid { reason, .. } => panic!("unexpected {reason}"),
                }
            })
            .collect();

        assert_eq!(events[0].customer_id, events[1].customer_id);
        assert_ne!(fingerprint(&events[0]), fingerprint(&events[1]));
        let (unique, dropped) = drop_duplicates(events);
        assert_eq!((unique.len(), dropped), (2, 0));
    }

    #[test]
    fn test_drop_duplicates_keeps_first_occurrence() {
        let mut second = click(Some("U2"));
        second.attributes.insert("n".into(), json!(2));
        let events = vec![click(Some("U1")), second.clone(), click(Some("U1")), second];

        let (unique, dropped) = drop_duplicates(events);
        assert_eq!(dropped, 2);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].user_id.as_deref(), Some("U1"));
        assert_eq!(unique[1].user_id.as_deref(), Some("U2"));
    }
}
