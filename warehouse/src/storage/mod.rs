pub mod local;
pub mod s3;

use async_trait::async_trait;
use common::Result;
use common::config::{SinkBackend, SinkConfig};
use std::sync::Arc;

pub use local::LocalStorage;
pub use s3::S3Storage;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `data` under `key`, replacing whatever was there.
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<()>;
    async fn get_object(&self, key: &str) -> Result<Vec<u8>>;
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>>;
    async fn check_file_exists(&self, key: &str) -> Result<bool>;
    /// Human-readable root of the store, for logs.
    fn location(&self) -> String;
}

pub fn build_storage(config: &SinkConfig) -> Result<Arc<dyn ObjectStorage>> {
    let storage: Arc<dyn ObjectStorage> = match config.backend {
        SinkBackend::Local => Arc::new(LocalStorage::new(&config.local.root)),
        SinkBackend::S3 => Arc::new(S3Storage::new(&config.s3)),
    };
    Ok(storage)
}
