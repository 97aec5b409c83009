mod encode;
mod schema;

pub use encode::{cleaned_data_batch, failed_data_batch, hourly_aggregates_batch};
pub use schema::{cleaned_data_schema, failed_data_schema, hourly_aggregates_schema};

use arrow::json::LineDelimitedWriter;
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use common::Result;
use common::config::SinkFormat;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    CleanedData,
    FailedData,
    HourlyAggregates,
}

impl TableName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CleanedData => "cleaned_data",
            Self::FailedData => "failed_data",
            Self::HourlyAggregates => "hourly_aggregates",
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named result set ready for the sink.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: TableName,
    pub batch: RecordBatch,
}

impl Table {
    pub fn new(name: TableName, batch: RecordBatch) -> Self {
        Self { name, batch }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Serializes the table into a complete file in `format`.
    pub fn serialize(&self, format: SinkFormat) -> Result<Vec<u8>> {
        match format {
            SinkFormat::Parquet => self.to_parquet(),
            SinkFormat::Ndjson => self.to_ndjson(),
        }
    }

    fn to_parquet(&self) -> Result<Vec<u8>> {
        let key_value_metadata = vec![
            KeyValue::new("table".to_string(), self.name.as_str().to_string()),
            KeyValue::new("row_count".to_string(), self.num_rows().to_string()),
            KeyValue::new("written_at".to_string(), Utc::now().to_rfc3339()),
        ];
        let writer_props = WriterProperties::builder()
            .set_key_value_metadata(Some(key_value_metadata))
            .build();

        let mut buffer: Vec<u8> = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buffer, self.batch.schema(), Some(writer_props))?;
        writer.write(&self.batch)?;
        writer.close()?;

        Ok(buffer)
    }

    fn to_ndjson(&self) -> Result<Vec<u8>> {
        let mut buffer: Vec<u8> = Vec::new();
        {
            let mut writer = LineDelimitedWriter::new(&mut buffer);
            writer.write(&self.batch)?;
            writer.finish()?;
        }
        Ok(buffer)
    }
}
