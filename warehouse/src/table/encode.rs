use super::schema::{cleaned_data_schema, failed_data_schema, hourly_aggregates_schema};
use arrow::array::{
    ArrayRef, Float64Array, StringArray, TimestampMillisecondArray, UInt64Array,
};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use common::Result;
use etl::models::{Event, FailedRecord, MetricRow};
use serde_json::Value;
use std::sync::Arc;

fn millis(ts: NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

pub fn cleaned_data_batch(events: &[Event]) -> Result<RecordBatch> {
    let event_type: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    let fired_at: Vec<i64> = events.iter().map(|e| millis(e.fired_at)).collect();
    let customer_id: Vec<Option<&str>> = events.iter().map(|e| e.customer_id.as_deref()).collect();
    let user_id: Vec<Option<&str>> = events.iter().map(|e| e.user_id.as_deref()).collect();
    let attributes: Vec<String> = events
        .iter()
        .map(|e| Value::Object(e.attributes.clone()).to_string())
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(event_type)),
        Arc::new(TimestampMillisecondArray::from(fired_at)),
        Arc::new(StringArray::from(customer_id)),
        Arc::new(StringArray::from(user_id)),
        Arc::new(StringArray::from(attributes)),
    ];

    Ok(RecordBatch::try_new(cleaned_data_schema(), columns)?)
}

pub fn failed_data_batch(failed: &[FailedRecord]) -> Result<RecordBatch> {
    let line_number: Vec<Option<u64>> = failed.iter().map(|f| f.line_number).collect();
    let reason: Vec<&str> = failed.iter().map(|f| f.reason.as_str()).collect();
    let detail: Vec<Option<&str>> = failed.iter().map(|f| f.detail.as_deref()).collect();
    let record: Vec<String> = failed.iter().map(|f| f.record.to_json()).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(UInt64Array::from(line_number)),
        Arc::new(StringArray::from(reason)),
        Arc::new(StringArray::from(detail)),
        Arc::new(StringArray::from(record)),
    ];

    Ok(RecordBatch::try_new(failed_data_schema(), columns)?)
}

pub fn hourly_aggregates_batch(rows: &[MetricRow]) -> Result<RecordBatch> {
    let customer_id: Vec<&str> = rows.iter().map(|r| r.customer_id.as_str()).collect();
    let hour: Vec<i64> = rows.iter().map(|r| millis(r.hour)).collect();
    let page_loads: Vec<u64> = rows.iter().map(|r| r.page_loads).collect();
    let clicks: Vec<u64> = rows.iter().map(|r| r.clicks).collect();
    let unique_user_clicks: Vec<u64> = rows.iter().map(|r| r.unique_user_clicks).collect();
    let click_through_rate: Vec<f64> = rows.iter().map(|r| r.click_through_rate).collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(customer_id)),
        Arc::new(TimestampMillisecondArray::from(hour)),
        Arc::new(UInt64Array::from(page_loads)),
        Arc::new(UInt64Array::from(clicks)),
        Arc::new(UInt64Array::from(unique_user_clicks)),
        Arc::new(Float64Array::from(click_through_rate)),
    ];

    Ok(RecordBatch::try_new(hourly_aggregates_schema(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use chrono::NaiveDate;
    use etl::models::{InvalidReason, RawRecord};
    use serde_json::{Map, json};

    fn hour() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_hourly_batch_columns() {
        let batch = hourly_aggregates_batch(&[MetricRow {
            customer_id: "C1".to_string(),
            hour: hour(),
            page_loads: 4,
            clicks: 1,
            unique_user_clicks: 1,
            click_through_rate: 0.25,
        }])
        .unwrap();

        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 6);
        let hours = batch
            .column(1)
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()
            .unwrap();
        assert_eq!(hours.value(0), 1_672_567_200_000);
        let rates = batch
            .column(5)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(rates.value(0), 0.25);
    }

    #[test]
    fn test_cleaned_batch_keeps_nullable_identifiers() {
        let mut attributes = Map::new();
        attributes.insert("campaign".to_string(), json!("spring"));
        let batch = cleaned_data_batch(&[Event {
            event_type: "ReferralPageLoad".to_string(),
            fired_at: hour(),
            customer_id: Some("C1".to_string()),
            user_id: None,
            attributes,
            source_identifiers: Map::new(),
        }])
        .unwrap();

        let users = batch.column(3).as_any().downcast_ref::<StringArray>().unwrap();
        assert!(users.is_null(0));
        let attrs = batch.column(4).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(attrs.value(0), r#"{"campaign":"spring"}"#);
    }

    #[test]
    fn test_failed_batch_rows() {
        let mut record = RawRecord::default();
        record.insert("event_type", json!("EMPTY_VALUE"));
        let batch = failed_data_batch(&[
            FailedRecord::invalid(InvalidReason::InvalidEventType, record),
            FailedRecord::malformed(9, "{oops", "EOF while parsing an object"),
        ])
        .unwrap();

        assert_eq!(batch.num_rows(), 2);
        let lines = batch.column(0).as_any().downcast_ref::<UInt64Array>().unwrap();
        assert!(lines.is_null(0));
        assert_eq!(lines.value(1), 9);
        let reasons = batch.column(1).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(reasons.value(0), "invalid_event_type");
        assert_eq!(reasons.value(1), "malformed_record");
        let records = batch.column(3).as_any().downcast_ref::<StringArray>().unwrap();
        assert_eq!(records.value(1), r#"{"line":"{oops"}"#);
    }

    #[test]
    fn test_empty_inputs_give_empty_batches() {
        assert_eq!(cleaned_data_batch(&[]).unwrap().num_rows(), 0);
        assert_eq!(failed_data_batch(&[]).unwrap().num_rows(), 0);
        assert_eq!(hourly_aggregates_batch(&[]).unwrap().num_rows(), 0);
    }
}
