/// Media inspection and editing backed by ffprobe / ffmpeg
///
/// Tools run through `tokio::process::Command`, so a long encode suspends
/// only the request that started it.
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::config::MediaConfig;
use crate::error::{AppError, Result};

const PROBE_FAILED: &str = "Error processing video";

/// Extracts the duration of a local media file
#[async_trait]
pub trait MediaInspector: Send + Sync {
    /// Duration in seconds
    async fn probe(&self, path: &Path) -> Result<f64>;
}

/// Cuts and joins local media files
#[async_trait]
pub trait MediaEditor: Send + Sync {
    /// Copy `length` seconds starting at `start` into `output`.
    /// With no length the cut runs to the end of the clip.
    async fn trim(
        &self,
        input: &Path,
        start: f64,
        length: Option<f64>,
        output: &Path,
    ) -> Result<PathBuf>;

    /// Concatenate `inputs` in order into `output`
    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct FfmpegToolkit {
    ffmpeg_path: String,
    ffprobe_path: String,
}

impl FfmpegToolkit {
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            ffprobe_path: config.ffprobe_path.clone(),
        }
    }

    async fn run_ffmpeg(&self, args: Vec<String>, action: &str) -> Result<()> {
        tracing::debug!(ffmpeg = %self.ffmpeg_path, ?args, "running ffmpeg");

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| AppError::Media(format!("ffmpeg spawn error: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.lines().last().unwrap_or("unknown error");
            return Err(AppError::Media(format!("ffmpeg {} failed: {}", action, detail)));
        }

        Ok(())
    }
}

#[async_trait]
impl MediaInspector for FfmpegToolkit {
    async fn probe(&self, path: &Path) -> Result<f64> {
        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_format", "-of", "json"])
            .arg(path)
            .output()
            .await
            .map_err(|e| {
                tracing::warn!(path = %path.display(), "ffprobe spawn error: {}", e);
                AppError::Media(PROBE_FAILED.to_string())
            })?;

        if !output.status.success() {
            tracing::warn!(
                path = %path.display(),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "ffprobe rejected input"
            );
            return Err(AppError::Media(PROBE_FAILED.to_string()));
        }

        parse_probe_duration(&output.stdout)
    }
}

#[async_trait]
impl MediaEditor for FfmpegToolkit {
    async fn trim(
        &self,
        input: &Path,
        start: f64,
        length: Option<f64>,
        output: &Path,
    ) -> Result<PathBuf> {
        let mut args = vec![
            "-y".to_string(),
            // -ss before -i for fast seeking
            "-ss".to_string(),
            start.to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
        ];
        if let Some(length) = length {
            args.push("-t".to_string());
            args.push(length.to_string());
        }
        args.push(output.to_string_lossy().into_owned());

        self.run_ffmpeg(args, "trim").await?;
        Ok(output.to_path_buf())
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf> {
        if inputs.is_empty() {
            return Err(AppError::Media("Nothing to concatenate".to_string()));
        }

        let mut args = vec!["-y".to_string()];
        for input in inputs {
            args.push("-i".to_string());
            args.push(input.to_string_lossy().into_owned());
        }
        args.push("-filter_complex".to_string());
        args.push(concat_filter(inputs.len()));
        args.extend(["-map", "[outv]", "-map", "[outa]"].map(String::from));
        args.push(output.to_string_lossy().into_owned());

        self.run_ffmpeg(args, "concat").await?;
        Ok(output.to_path_buf())
    }
}

/// `[0:v:0][0:a:0][1:v:0][1:a:0]concat=n=2:v=1:a=1[outv][outa]`
fn concat_filter(inputs: usize) -> String {
    let mut filter: String = (0..inputs)
        .map(|i| format!("[{i}:v:0][{i}:a:0]"))
        .collect();
    filter.push_str(&format!("concat=n={inputs}:v=1:a=1[outv][outa]"));
    filter
}

/// Read `format.duration` from `ffprobe -of json` output
fn parse_probe_duration(stdout: &[u8]) -> Result<f64> {
    let json: Value =
        serde_json::from_slice(stdout).map_err(|_| AppError::Media(PROBE_FAILED.to_string()))?;

    let duration = &json["format"]["duration"];
    duration
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| duration.as_f64())
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| AppError::Media(PROBE_FAILED.to_string()))
}
