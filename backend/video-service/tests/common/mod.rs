//! In-memory collaborators for exercising the HTTP surface without
//! Postgres, S3 or ffmpeg.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use uuid::Uuid;

use video_service::config::UploadLimits;
use video_service::db::{UserRepository, VideoRepository};
use video_service::error::{AppError, Result};
use video_service::models::{NewVideo, User, Video};
use video_service::services::{
    MediaEditor, MediaInspector, ObjectStore, StagingArea, VideoLifecycle,
};

pub const OWNER_ONE: &str = "1";
pub const OWNER_TWO: &str = "2";
pub const TOKEN_ONE: &str = "Bearer v!de0ver$eTe$tT0ken_1";
pub const TOKEN_TWO: &str = "Bearer v!de0ver$eTe$tT0ken_2";

#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: Mutex<HashMap<Uuid, Video>>,
}

impl InMemoryVideoRepository {
    pub fn insert(&self, video: Video) {
        self.videos.lock().unwrap().insert(video.id, video);
    }

    pub fn get(&self, id: Uuid) -> Option<Video> {
        self.videos.lock().unwrap().get(&id).cloned()
    }

    pub fn count(&self) -> usize {
        self.videos.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create(&self, video: NewVideo) -> Result<Video> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: video.user_id.0,
            file_name: video.file_name,
            size: video.size,
            duration: video.duration,
            mime_type: Some(video.mime_type),
            created_at: now,
            updated_at: now,
        };
        self.insert(video.clone());
        Ok(video)
    }

    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<Video>> {
        Ok(self.get(video_id))
    }

    async fn find_many(&self, video_ids: &[Uuid]) -> Result<Vec<Video>> {
        let videos = self.videos.lock().unwrap();
        Ok(video_ids.iter().filter_map(|id| videos.get(id).cloned()).collect())
    }

    async fn update_duration(&self, video_id: Uuid, duration: f64) -> Result<Video> {
        let mut videos = self.videos.lock().unwrap();
        let video = videos
            .get_mut(&video_id)
            .ok_or_else(AppError::video_not_found)?;
        video.duration = duration;
        video.updated_at = Utc::now();
        Ok(video.clone())
    }
}

pub struct InMemoryUserRepository {
    tokens: HashMap<String, String>,
}

impl InMemoryUserRepository {
    pub fn seeded() -> Self {
        let tokens = [OWNER_ONE, OWNER_TWO]
            .iter()
            .map(|id| (id.to_string(), format!("v!de0ver$eTe$tT0ken_{}", id)))
            .collect();
        Self { tokens }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        Ok(self.tokens.get(user_id).map(|token| User {
            id: user_id.to_string(),
            token: token.clone(),
            created_at: Utc::now(),
        }))
    }
}

/// Object store keeping bytes in memory, with injectable failures
#[derive(Default)]
pub struct FakeObjectStore {
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    put_failure: Mutex<Option<String>>,
    sign_failure: Mutex<Option<String>>,
}

impl FakeObjectStore {
    pub fn seed(&self, key: &str, bytes: &[u8], content_type: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes.to_vec(), content_type.to_string()));
    }

    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn fail_puts_with(&self, message: &str) {
        *self.put_failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn fail_signs_with(&self, message: &str) {
        *self.sign_failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(&self, key: &str, local_path: &Path, content_type: &str) -> Result<String> {
        if let Some(message) = self.put_failure.lock().unwrap().clone() {
            return Err(AppError::Storage(message));
        }
        let bytes = tokio::fs::read(local_path).await?;
        self.seed(key, &bytes, content_type);
        Ok(format!("memory://videos-bucket/{}", key))
    }

    async fn get(&self, key: &str, dest: &Path) -> Result<()> {
        let (bytes, _) = self
            .object(key)
            .ok_or_else(|| AppError::Storage("The specified key does not exist.".to_string()))?;
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }

    async fn sign(&self, key: &str) -> Result<String> {
        if let Some(message) = self.sign_failure.lock().unwrap().clone() {
            return Err(AppError::Storage(message));
        }
        Ok(format!("https://videos-bucket.example/{}?X-Amz-Expires=300", key))
    }
}

/// Media toolkit reporting a fixed duration. Trims copy the input,
/// concats join the inputs byte-wise.
pub struct FakeMedia {
    duration: Mutex<f64>,
    probe_fails: Mutex<bool>,
    concat_fails: Mutex<bool>,
    trims: Mutex<Vec<(f64, Option<f64>)>>,
    concats: Mutex<Vec<usize>>,
}

impl FakeMedia {
    pub fn with_duration(duration: f64) -> Self {
        Self {
            duration: Mutex::new(duration),
            probe_fails: Mutex::new(false),
            concat_fails: Mutex::new(false),
            trims: Mutex::new(Vec::new()),
            concats: Mutex::new(Vec::new()),
        }
    }

    pub fn set_duration(&self, duration: f64) {
        *self.duration.lock().unwrap() = duration;
    }

    pub fn fail_probes(&self) {
        *self.probe_fails.lock().unwrap() = true;
    }

    pub fn fail_concats(&self) {
        *self.concat_fails.lock().unwrap() = true;
    }

    pub fn trims(&self) -> Vec<(f64, Option<f64>)> {
        self.trims.lock().unwrap().clone()
    }

    pub fn concats(&self) -> Vec<usize> {
        self.concats.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaInspector for FakeMedia {
    async fn probe(&self, path: &Path) -> Result<f64> {
        if *self.probe_fails.lock().unwrap() || !path.exists() {
            return Err(AppError::Media("Error processing video".to_string()));
        }
        Ok(*self.duration.lock().unwrap())
    }
}

#[async_trait]
impl MediaEditor for FakeMedia {
    async fn trim(
        &self,
        input: &Path,
        start: f64,
        length: Option<f64>,
        output: &Path,
    ) -> Result<PathBuf> {
        self.trims.lock().unwrap().push((start, length));
        tokio::fs::copy(input, output).await?;
        Ok(output.to_path_buf())
    }

    async fn concat(&self, inputs: &[PathBuf], output: &Path) -> Result<PathBuf> {
        self.concats.lock().unwrap().push(inputs.len());
        if *self.concat_fails.lock().unwrap() {
            return Err(AppError::Media(
                "ffmpeg concat failed: Invalid data found when processing input".to_string(),
            ));
        }
        let mut joined = Vec::new();
        for input in inputs {
            joined.extend(tokio::fs::read(input).await?);
        }
        tokio::fs::write(output, joined).await?;
        Ok(output.to_path_buf())
    }
}

pub struct TestContext {
    pub videos: Arc<InMemoryVideoRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub store: Arc<FakeObjectStore>,
    pub media: Arc<FakeMedia>,
    pub limits: UploadLimits,
    staging_dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            videos: Arc::new(InMemoryVideoRepository::default()),
            users: Arc::new(InMemoryUserRepository::seeded()),
            store: Arc::new(FakeObjectStore::default()),
            media: Arc::new(FakeMedia::with_duration(5.25)),
            limits: UploadLimits::default(),
            staging_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn staging_root(&self) -> PathBuf {
        self.staging_dir.path().join("uploads")
    }

    pub fn lifecycle(&self) -> VideoLifecycle {
        VideoLifecycle::new(
            self.videos.clone(),
            self.store.clone(),
            self.media.clone(),
            self.media.clone(),
            StagingArea::new(self.staging_root()).unwrap(),
            self.limits,
        )
    }

    /// Files currently left in staging
    pub fn staged_files(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.staging_root()) {
            Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Register an asset and its remote bytes
    pub fn add_video(&self, owner: &str, file_name: &str, duration: f64) -> Video {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id: owner.to_string(),
            file_name: file_name.to_string(),
            size: 2048,
            duration,
            mime_type: Some("video/mp4".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.store.seed(&video.storage_key(), file_name.as_bytes(), "video/mp4");
        self.videos.insert(video.clone());
        video
    }
}

/// One multipart part
pub struct Part<'a> {
    pub name: &'a str,
    pub file_name: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: Vec<u8>,
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: Vec<u8>) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            content_type: Some(content_type),
            data,
        }
    }

    pub fn text(name: &'a str, value: &str) -> Self {
        Self {
            name,
            file_name: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

const BOUNDARY: &str = "----videoServiceTestBoundary";

/// Encode `parts` as multipart/form-data, returning the header value and body
pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend(format!("--{}\r\n", BOUNDARY).into_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(file_name) = part.file_name {
            disposition.push_str(&format!("; filename=\"{}\"", file_name));
        }
        body.extend(disposition.into_bytes());
        body.extend(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend(format!("Content-Type: {}\r\n", content_type).into_bytes());
        }
        body.extend(b"\r\n");
        body.extend(&part.data);
        body.extend(b"\r\n");
    }
    body.extend(format!("--{}--\r\n", BOUNDARY).into_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
