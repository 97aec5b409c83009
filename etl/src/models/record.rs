use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const EVENT_TYPE_FIELD: &str = "event_type";
pub const FIRED_AT_FIELD: &str = "fired_at";
pub const CUSTOMER_ID_FIELD: &str = "customer_id";
pub const USER_ID_FIELD: &str = "user_id";

/// One parsed input line: a JSON object with no schema enforced yet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    /// Parses one newline-delimited JSON line. Anything other than a JSON
    /// object is rejected.
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_object() {
        let record = RawRecord::parse(
            r#"{"event_type": "ReferralPageLoad", "fired_at": "01/01/2023, 10:15:00", "customer_id": 7}"#,
        )
        .unwrap();
        assert_eq!(record.len(), 3);
        assert_eq!(record.get(EVENT_TYPE_FIELD), Some(&json!("ReferralPageLoad")));
        assert_eq!(record.get(CUSTOMER_ID_FIELD), Some(&json!(7)));
        assert_eq!(record.get(USER_ID_FIELD), None);
    }

    #[test]
    fn test_parse_rejects_non_objects() {
        assert!(RawRecord::parse("not json").is_err());
        assert!(RawRecord::parse("[1, 2, 3]").is_err());
        assert!(RawRecord::parse("42").is_err());
        assert!(RawRecord::parse(r#"{"event_type": "#).is_err());
    }
}
