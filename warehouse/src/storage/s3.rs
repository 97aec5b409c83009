use super::ObjectStorage;
use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::SdkError;
use bytes::Bytes;
use common::{Error, Result};
use common::config::S3Config;
use std::fmt;

/// One bucket on S3 or an S3-compatible endpoint such as MinIO.
pub struct S3Storage {
    bucket: String,
    client: S3Client,
}

impl S3Storage {
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "static",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint)
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            bucket: config.bucket.clone(),
            client: S3Client::from_conf(s3_config),
        }
    }
}

/// Service errors carry the modeled S3 message. Any other failure falls back
/// to the SDK's own description.
fn storage_error<E, R>(error: SdkError<E, R>) -> Error
where
    E: fmt::Display,
{
    match error {
        SdkError::ServiceError(err) => Error::Storage(err.into_err().to_string()),
        other => Error::Storage(other.to_string()),
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put_object(&self, key: &str, data: &[u8]) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(Bytes::copy_from_slice(data).into())
            .send()
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match e {
                SdkError::ServiceError(err) if err.err().is_no_such_key() => Error::Storage(
                    format!("Object {} not found in {}", key, self.location()),
                ),
                other => storage_error(other),
            })?;

        Ok(response.body.collect().await?.into_bytes().to_vec())
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(storage_error)?;

            objects.extend(
                response
                    .contents
                    .unwrap_or_default()
                    .into_iter()
                    .filter_map(|object| object.key),
            );

            match response.next_continuation_token {
                Some(token) => continuation_token = Some(token),
                None => break,
            }
        }

        objects.sort();
        Ok(objects)
    }

    async fn check_file_exists(&self, key: &str) -> Result<bool> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(err)) if err.err().is_not_found() => Ok(false),
            Err(e) => Err(storage_error(e)),
        }
    }

    fn location(&self) -> String {
        format!("s3://{}", self.bucket)
    }
}
