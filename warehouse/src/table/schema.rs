use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use std::sync::Arc;

fn timestamp() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, None)
}

pub fn cleaned_data_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("event_type", DataType::Utf8, false),
        Field::new("fired_at", timestamp(), false),
        Field::new("customer_id", DataType::Utf8, true),
        Field::new("user_id", DataType::Utf8, true),
        // JSON object of every other source field
        Field::new("attributes", DataType::Utf8, false),
    ]))
}

pub fn failed_data_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("line_number", DataType::UInt64, true),
        Field::new("invalid_data_reason", DataType::Utf8, false),
        Field::new("detail", DataType::Utf8, true),
        Field::new("record", DataType::Utf8, false),
    ]))
}

pub fn hourly_aggregates_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("hour", timestamp(), false),
        Field::new("page_loads", DataType::UInt64, false),
        Field::new("clicks", DataType::UInt64, false),
        Field::new("unique_user_clicks", DataType::UInt64, false),
        Field::new("click_through_rate", DataType::Float64, false),
    ]))
}
