/// Configuration management for video-service
///
/// Loads configuration from environment variables with sensible defaults.
/// Everything is resolved once at startup; handlers only see the parsed values.
use s3_utils::S3Config;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub s3: S3Config,
    pub limits: UploadLimits,
    pub media: MediaConfig,
    pub staging: StagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub env: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Upload acceptance window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Megabytes; fractional values are allowed
    pub max_file_size_mb: f64,
    pub min_duration_secs: f64,
    pub max_duration_secs: f64,
}

impl UploadLimits {
    /// Byte ceiling for one upload. The float to int cast saturates.
    pub fn max_file_size_bytes(&self) -> u64 {
        (self.max_file_size_mb * video_core::constants::BYTES_PER_MB as f64) as u64
    }

    pub fn duration_in_range(&self, duration: f64) -> bool {
        duration >= self.min_duration_secs && duration <= self.max_duration_secs
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: 25.0,
            min_duration_secs: 1.0,
            max_duration_secs: 300.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    pub dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let limits = UploadLimits {
            max_file_size_mb: parse_var("MAX_FILE_SIZE_MB", 25.0)?,
            min_duration_secs: parse_var("MIN_DURATION_SECS", 1.0)?,
            max_duration_secs: parse_var("MAX_DURATION_SECS", 300.0)?,
        };
        if !limits.max_file_size_mb.is_finite() || limits.max_file_size_mb < 0.0 {
            return Err(format!(
                "MAX_FILE_SIZE_MB must be a non-negative number, got {}",
                limits.max_file_size_mb
            )
            .into());
        }
        if limits.min_duration_secs > limits.max_duration_secs {
            return Err(format!(
                "MIN_DURATION_SECS ({}) must not exceed MAX_DURATION_SECS ({})",
                limits.min_duration_secs, limits.max_duration_secs
            )
            .into());
        }

        Ok(Config {
            app: AppConfig {
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("PORT", 3000)?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            s3: S3Config::from_env()?,
            limits,
            media: MediaConfig {
                ffmpeg_path: std::env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
                ffprobe_path: std::env::var("FFPROBE_PATH")
                    .unwrap_or_else(|_| "ffprobe".to_string()),
            },
            staging: StagingConfig {
                dir: std::env::var("STAGING_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| std::env::temp_dir().join("video-service").join("uploads")),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}

/// Parse an optional variable, falling back to `default` when unset.
/// A present but malformed value is an error naming the variable.
fn parse_var<T>(name: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| format!("{name} has an invalid value {raw:?}: {e}")),
        _ => Ok(default),
    }
}
