use super::event::Event;
use super::record::RawRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// `event_type` missing, null, empty, not a string, or `"EMPTY_VALUE"`.
    InvalidEventType,
    /// `fired_at` missing or not in `MM/DD/YYYY, HH:MM:SS`.
    InvalidDateFormat,
    /// The line is not a JSON object at all. Only produced while streaming.
    MalformedRecord,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEventType => "invalid_event_type",
            Self::InvalidDateFormat => "invalid_date_format",
            Self::MalformedRecord => "malformed_record",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Valid(Event),
    Invalid {
        reason: InvalidReason,
        record: RawRecord,
    },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn reason(&self) -> Option<InvalidReason> {
        match self {
            Self::Valid(_) => None,
            Self::Invalid { reason, .. } => Some(*reason),
        }
    }
}

/// A record diverted from the pipeline, kept whole for audit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRecord {
    pub line_number: Option<u64>,
    pub reason: InvalidReason,
    pub detail: Option<String>,
    pub record: RawRecord,
}

impl FailedRecord {
    pub fn invalid(reason: InvalidReason, record: RawRecord) -> Self {
        Self {
            line_number: None,
            reason,
            detail: None,
            record,
        }
    }

    /// An unparseable line. The raw text is kept under a `line` field.
    pub fn malformed(line_number: u64, line: &str, detail: impl Into<String>) -> Self {
        let mut record = RawRecord::default();
        record.insert("line", Value::String(line.to_string()));
        Self {
            line_number: Some(line_number),
            reason: InvalidReason::MalformedRecord,
            detail: Some(detail.into()),
            record,
        }
    }

    pub fn with_line_number(mut self, line_number: u64) -> Self {
        self.line_number = Some(line_number);
        self
    }
}
