//! Validation, hourly bucketing and engagement metrics for referral events.
//!
//! Raw lines become [`models::RawRecord`]s, the [`processor::RecordValidator`]
//! turns them into typed [`models::Event`]s or failed rows, and either the
//! [`processor::BatchAggregator`] or the [`processor::StreamingAggregator`]
//! reduces events to one [`models::MetricRow`] per customer and hour.

pub mod models;
pub mod processor;
