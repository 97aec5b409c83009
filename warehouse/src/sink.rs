use crate::storage::ObjectStorage;
use crate::table::{Table, TableName};
use common::Result;
use common::config::{SinkConfig, SinkFormat};
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::info;

/// Persists named tables as whole objects, one per table, replacing any
/// previous run's output.
pub struct TableSink {
    storage: Arc<dyn ObjectStorage>,
    format: SinkFormat,
    prefix: String,
}

impl TableSink {
    pub fn new(storage: Arc<dyn ObjectStorage>, format: SinkFormat, prefix: &str) -> Self {
        Self {
            storage,
            format,
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    pub fn from_config(storage: Arc<dyn ObjectStorage>, config: &SinkConfig) -> Self {
        Self::new(storage, config.format, &config.prefix)
    }

    pub fn object_key(&self, table: TableName) -> String {
        let file_name = format!("{}.{}", table, self.format.extension());
        if self.prefix.is_empty() {
            file_name
        } else {
            format!("{}/{}", self.prefix, file_name)
        }
    }

    pub async fn write_table(&self, table: &Table) -> Result<String> {
        let key = self.object_key(table.name);
        info!(
            table = %table.name,
            rows = table.num_rows(),
            location = %self.storage.location(),
            "Inserting data into table"
        );

        let data = table.serialize(self.format)?;
        self.storage.put_object(&key, &data).await?;

        info!(table = %table.name, key = %key, "Data inserted into table");
        Ok(key)
    }

    /// Writes every table concurrently; returns their keys in input order.
    pub async fn write_all(&self, tables: &[Table]) -> Result<Vec<String>> {
        try_join_all(tables.iter().map(|table| self.write_table(table))).await
    }
}
