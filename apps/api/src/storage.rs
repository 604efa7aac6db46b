use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use tracing::{debug, info};

use crate::config::Config;

/// Read access to an object store, addressed by bucket and key.
///
/// Carried in `AppState` as `Arc<dyn ObjectStore>`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Downloads the whole object into memory.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}

/// S3 (or S3-compatible) object store.
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    /// Constructs an S3 client from static credentials. When `S3_ENDPOINT` is
    /// set the client targets that endpoint with path-style addressing (MinIO).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "resume-parser-static",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.aws_region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.s3_endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.s3_endpoint.is_some())
            .build();

        info!(
            "S3 client initialized (region: {}, endpoint: {})",
            config.aws_region,
            config.s3_endpoint.as_deref().unwrap_or("aws")
        );

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to fetch s3://{bucket}/{key}: {}",
                    DisplayErrorContext(e)
                )
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| anyhow!("Failed to read s3://{bucket}/{key}: {e}"))?
            .into_bytes();

        debug!("Fetched s3://{}/{} ({} bytes)", bucket, key, data.len());
        Ok(data)
    }
}
