/// S3 access for the video bucket
///
/// Wraps the AWS SDK client with the handful of operations the video
/// pipeline needs: upload from a local file, download into a local file,
/// presigned GET links and a bucket health check.

use aws_sdk_s3::Client;
use std::sync::Arc;
use thiserror::Error;

pub mod config;
pub mod operations;

pub use config::S3Config;
pub use operations::S3Operations;

/// Errors raised by S3 operations.
///
/// Display strings carry the underlying SDK message so callers can surface
/// them unchanged.
#[derive(Debug, Error)]
pub enum S3Error {
    #[error("{0}")]
    Upload(String),

    #[error("{0}")]
    Download(String),

    #[error("{0}")]
    Presign(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

pub type S3Result<T> = std::result::Result<T, S3Error>;

/// Shared S3 client wrapper
#[derive(Clone)]
pub struct S3Client {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Client {
    /// Create new S3 client with custom configuration
    pub async fn with_config(config: S3Config) -> Self {
        use aws_sdk_s3::config::{Credentials, Region};

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            let credentials = Credentials::new(
                access_key_id,
                secret_access_key,
                None,
                None,
                "video_service_s3",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        // MinIO and friends only speak path-style addressing
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint.is_some())
            .build();

        Self {
            client: Arc::new(Client::from_conf(s3_config)),
            config,
        }
    }

    /// Operations bound to the configured bucket
    pub fn operations(&self) -> S3Operations {
        S3Operations::new(self.client.clone(), self.config.clone())
    }

    /// Health check for S3 connectivity
    pub async fn health_check(&self) -> S3Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.config.bucket)
            .send()
            .await
            .map_err(|e| {
                S3Error::Unavailable(format!("bucket {} unreachable: {}", self.config.bucket, e))
            })?;

        tracing::info!(
            bucket = %self.config.bucket,
            region = %self.config.region,
            "S3 connection validated"
        );
        Ok(())
    }
}
