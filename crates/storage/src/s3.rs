//! S3-compatible backend (AWS S3, MinIO, R2, GCS interoperability mode).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::{FileStorage, StorageError};

/// Connection settings for [`S3Storage`].
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for non-AWS providers. Enables path-style addressing.
    pub endpoint: Option<String>,
    /// Base URL objects are publicly served from, e.g. a CDN.
    pub public_base_url: Option<String>,
}

impl StorageConfig {
    /// Public URL of `key` under this configuration.
    pub fn public_url(&self, key: &str) -> String {
        match (&self.public_base_url, &self.endpoint) {
            (Some(base), _) => format!("{}/{key}", base.trim_end_matches('/')),
            (None, Some(endpoint)) => {
                format!("{}/{}/{key}", endpoint.trim_end_matches('/'), self.bucket)
            }
            (None, None) => format!(
                "https://{}.s3.{}.amazonaws.com/{key}",
                self.bucket, self.region
            ),
        }
    }
}

pub struct S3Storage {
    client: Client,
    config: StorageConfig,
}

impl S3Storage {
    /// Build a client from the ambient AWS credential chain and `config`.
    pub async fn connect(config: StorageConfig) -> Result<Self, StorageError> {
        if config.bucket.trim().is_empty() {
            return Err(StorageError::Config("bucket name is empty".into()));
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        tracing::info!(
            bucket = %config.bucket,
            endpoint = ?config.endpoint,
            "Object storage configured"
        );
        Ok(Self { client, config })
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: aws_sdk_s3::error::DisplayErrorContext(&e).to_string(),
            })?;

        tracing::debug!(key, size, "Object uploaded");
        Ok(self.config.public_url(key))
    }
}
