/// S3 configuration for the video bucket
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Explicit access key (default credential chain when absent)
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Custom endpoint for S3-compatible storage (MinIO, LocalStack)
    pub endpoint: Option<String>,
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            bucket: std::env::var("AWS_BUCKET_NAME")
                .map_err(|_| "AWS_BUCKET_NAME must be set")?,
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
            endpoint: std::env::var("S3_ENDPOINT").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Location of an object, as reported after an upload
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                key
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn config(endpoint: Option<&str>) -> S3Config {
        S3Config {
            bucket: "test-bucket".to_string(),
            region: "eu-west-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: endpoint.map(str::to_string),
        }
    }

    #[test]
    fn test_object_url_virtual_hosted_style() {
        let url = config(None).object_url("videos/clip.mp4");
        assert_eq!(url, "https://test-bucket.s3.eu-west-1.amazonaws.com/videos/clip.mp4");
    }

    #[test]
    fn test_object_url_custom_endpoint() {
        let url = config(Some("http://localhost:9000/")).object_url("videos/clip.mp4");
        assert_eq!(url, "http://localhost:9000/test-bucket/videos/clip.mp4");
    }

    #[test]
    #[serial]
    fn test_from_env_requires_bucket() {
        std::env::remove_var("AWS_BUCKET_NAME");
        assert!(S3Config::from_env().is_err());

        std::env::set_var("AWS_BUCKET_NAME", "clips");
        std::env::set_var("S3_ENDPOINT", "");
        let cfg = S3Config::from_env().unwrap();
        assert_eq!(cfg.bucket, "clips");
        assert!(cfg.endpoint.is_none());

        std::env::remove_var("AWS_BUCKET_NAME");
        std::env::remove_var("S3_ENDPOINT");
    }
}
