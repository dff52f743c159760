/// S3 operations for video upload, download and sharing
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::S3Config;
use crate::{S3Error, S3Result};

#[derive(Clone)]
pub struct S3Operations {
    client: Arc<Client>,
    config: S3Config,
}

impl S3Operations {
    pub fn new(client: Arc<Client>, config: S3Config) -> Self {
        Self { client, config }
    }

    /// Upload a local file, returning the object location
    pub async fn upload_file(
        &self,
        key: &str,
        local_path: &Path,
        content_type: &str,
    ) -> S3Result<String> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            S3Error::Upload(format!("Failed to read file {}: {}", local_path.display(), e))
        })?;

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .metadata("uploaded_at", chrono::Utc::now().to_rfc3339())
            .send()
            .await
            .map_err(|e| {
                let message = e.to_string();
                if message.contains("NoSuchBucket") {
                    S3Error::Upload(format!("S3 bucket not found: {}", self.config.bucket))
                } else {
                    S3Error::Upload(format!("S3 upload failed: {}", message))
                }
            })?;

        tracing::debug!(bucket = %self.config.bucket, %key, "object uploaded");
        Ok(self.config.object_url(key))
    }

    /// Stream an object into a local file, replacing it if present
    pub async fn download_to_file(&self, key: &str, dest: &Path) -> S3Result<()> {
        let response = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| S3Error::Download(format!("S3 download failed for {}: {}", key, e)))?;

        let mut reader = response.body.into_async_read();
        let mut file = tokio::fs::File::create(dest).await?;
        tokio::io::copy(&mut reader, &mut file).await?;

        tracing::debug!(
            bucket = %self.config.bucket,
            %key,
            dest = %dest.display(),
            "object downloaded"
        );
        Ok(())
    }

    /// Presigned GET URL valid for `expires_in_secs`
    pub async fn presigned_download_url(
        &self,
        key: &str,
        expires_in_secs: u64,
    ) -> S3Result<String> {
        let presigning = PresigningConfig::expires_in(Duration::from_secs(expires_in_secs))
            .map_err(|e| S3Error::Presign(format!("Invalid presigning config: {}", e)))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| S3Error::Presign(format!("Failed to generate pre-signed URL: {}", e)))?;

        Ok(request.uri().to_string())
    }
}
