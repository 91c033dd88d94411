//! S3-compatible backend (AWS in production, MinIO locally).
//!
//! A single `PutObject` either stores the whole body or nothing, so no
//! temporary key is needed.

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;

use crate::config::S3Settings;
use crate::storage::{is_safe_filename, DocumentStore, StorageError, StoredObject};

const KEY_PREFIX: &str = "resumes/";

#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Constructs a client configured for MinIO (local) or AWS (production).
    pub async fn from_settings(settings: &S3Settings) -> Self {
        let credentials = Credentials::new(
            &settings.access_key_id,
            &settings.secret_access_key,
            None,
            None,
            "smartcv-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&settings.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self::new(S3Client::from_conf(s3_config), settings.bucket.clone())
    }

    fn location(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

fn object_key(name: &str) -> String {
    format!("{KEY_PREFIX}{name}")
}

#[async_trait]
impl DocumentStore for S3Store {
    async fn init(&self) -> Result<(), StorageError> {
        // Buckets are provisioned out of band.
        info!("Using object storage bucket '{}'", self.bucket);
        Ok(())
    }

    async fn put(&self, name: &str, bytes: Bytes) -> Result<StoredObject, StorageError> {
        if !is_safe_filename(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        let key = object_key(name);
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| StorageError::Remote {
                name: name.to_string(),
                message: format!("S3 upload failed: {e}"),
            })?;

        Ok(StoredObject {
            location: self.location(&key),
            size,
        })
    }

    async fn fetch(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        if !is_safe_filename(name) {
            return Ok(None);
        }
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(object_key(name))
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => {
                return Err(StorageError::Remote {
                    name: name.to_string(),
                    message: format!("S3 download failed: {e}"),
                })
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Remote {
                name: name.to_string(),
                message: format!("S3 body read failed: {e}"),
            })?;
        Ok(Some(data.into_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_prefixed() {
        assert_eq!(object_key("SmartCV_1_a.pdf"), "resumes/SmartCV_1_a.pdf");
    }
}
