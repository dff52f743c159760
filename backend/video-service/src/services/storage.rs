/// Remote object store used by the lifecycle coordinator
///
/// The S3 implementation is bound to one bucket at construction; tests swap
/// in an in-memory store through the same trait.
use async_trait::async_trait;
use s3_utils::S3Operations;
use std::path::Path;

use crate::error::Result;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `local_path` under `key`, returning the object location
    async fn put(&self, key: &str, local_path: &Path, content_type: &str) -> Result<String>;

    /// Download `key` into `dest`
    async fn get(&self, key: &str, dest: &Path) -> Result<()>;

    /// Time-limited (5 minute) GET URL for `key`
    async fn sign(&self, key: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct S3ObjectStore {
    ops: S3Operations,
    share_expiry_secs: u64,
}

impl S3ObjectStore {
    pub fn new(ops: S3Operations) -> Self {
        Self {
            ops,
            share_expiry_secs: video_core::constants::SHARE_URL_EXPIRY_SECS,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, local_path: &Path, content_type: &str) -> Result<String> {
        Ok(self.ops.upload_file(key, local_path, content_type).await?)
    }

    async fn get(&self, key: &str, dest: &Path) -> Result<()> {
        Ok(self.ops.download_to_file(key, dest).await?)
    }

    async fn sign(&self, key: &str) -> Result<String> {
        Ok(self
            .ops
            .presigned_download_url(key, self.share_expiry_secs)
            .await?)
    }
}
