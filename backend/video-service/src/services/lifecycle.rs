//! Asset lifecycle coordinator
//!
//! Runs the validate → stage → persist → record → clean up sequence for
//! upload, trim and merge, and issues share links. Every local file a flow
//! touches is a [`StagedFile`] guard, so cleanup happens on every exit path.
//! Remote writes always complete before the registry is touched.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info};
use uuid::Uuid;
use video_core::constants::{ALLOWED_MIME_TYPES, ALLOWED_TYPES_LABEL, MERGED_CONTENT_TYPE};

use crate::config::UploadLimits;
use crate::db::VideoRepository;
use crate::error::{AppError, Result};
use crate::models::{NewVideo, OwnerId, TrimRequest, Video};
use crate::services::media::{MediaEditor, MediaInspector};
use crate::services::staging::{StagedFile, StagingArea};
use crate::services::storage::ObjectStore;
use crate::services::trim::plan_trim;

const TOO_FEW_VIDEOS: &str = "At least two video IDs are required.";

/// A file received from a client and already written to staging
#[derive(Debug)]
pub struct IncomingUpload {
    pub file: StagedFile,
    /// Declared MIME type of the multipart part
    pub content_type: Option<String>,
    pub size: u64,
}

#[derive(Clone)]
pub struct VideoLifecycle {
    videos: Arc<dyn VideoRepository>,
    store: Arc<dyn ObjectStore>,
    inspector: Arc<dyn MediaInspector>,
    editor: Arc<dyn MediaEditor>,
    staging: StagingArea,
    limits: UploadLimits,
}

impl VideoLifecycle {
    pub fn new(
        videos: Arc<dyn VideoRepository>,
        store: Arc<dyn ObjectStore>,
        inspector: Arc<dyn MediaInspector>,
        editor: Arc<dyn MediaEditor>,
        staging: StagingArea,
        limits: UploadLimits,
    ) -> Self {
        Self {
            videos,
            store,
            inspector,
            editor,
            staging,
            limits,
        }
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Declared MIME type must be one of the allowed video types
    pub fn accept_content_type(&self, declared: Option<&str>) -> Result<String> {
        declared
            .filter(|ct| ALLOWED_MIME_TYPES.contains(ct))
            .map(str::to_owned)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "Invalid file type. Allowed types are {}.",
                    ALLOWED_TYPES_LABEL
                ))
            })
    }

    /// Byte count must not exceed the configured upload limit
    pub fn check_size(&self, size: u64) -> Result<()> {
        if size > self.limits.max_file_size_bytes() {
            return Err(AppError::Validation(format!(
                "File size exceeds the maximum limit of {} MB.",
                self.limits.max_file_size_mb
            )));
        }
        Ok(())
    }

    /// Validate a staged upload (type → size → duration), push it to the
    /// object store and record it.
    pub async fn upload(&self, owner: &OwnerId, upload: IncomingUpload) -> Result<Video> {
        let IncomingUpload {
            file,
            content_type,
            size,
        } = upload;

        let content_type = self.accept_content_type(content_type.as_deref())?;
        self.check_size(size)?;

        let result = self.persist_upload(owner, &file, content_type, size).await;
        if let Err(err) = &result {
            if err.is_unexpected() {
                error!(%owner, file_name = %file.file_name(), "upload failed: {}", err);
            }
        }
        result
    }

    async fn persist_upload(
        &self,
        owner: &OwnerId,
        file: &StagedFile,
        content_type: String,
        size: u64,
    ) -> Result<Video> {
        let duration = self.inspector.probe(file.path()).await?;
        if !self.limits.duration_in_range(duration) {
            return Err(AppError::Validation(format!(
                "Video duration must be between {} and {} seconds.",
                self.limits.min_duration_secs, self.limits.max_duration_secs
            )));
        }

        let key = video_core::storage_key(file.file_name());
        let location = self.store.put(&key, file.path(), &content_type).await?;

        let video = self
            .videos
            .create(NewVideo {
                user_id: owner.clone(),
                file_name: file.file_name().to_string(),
                size: i64::try_from(size)
                    .map_err(|_| AppError::Internal(format!("file size {} out of range", size)))?,
                duration,
                mime_type: content_type,
            })
            .await?;

        info!(video_id = %video.id, %owner, %location, duration, "video uploaded");
        Ok(video)
    }

    /// Replace an owned asset's bytes with a sub-range and re-measure it
    pub async fn trim(&self, owner: &OwnerId, video_id: Uuid, req: &TrimRequest) -> Result<Video> {
        let video = self.owned_video(owner, video_id, "User can only trim own video.").await?;
        let window = plan_trim(req, video.duration)?;

        let original = self.staging.reserve_unique(&video.file_name);
        let trimmed = original.trimmed_sibling();

        let result = async {
            let key = video.storage_key();
            self.store.get(&key, original.path()).await?;
            self.editor
                .trim(original.path(), window.start, window.length, trimmed.path())
                .await?;
            self.store.put(&key, trimmed.path(), video.content_type()).await?;

            let duration = self.inspector.probe(trimmed.path()).await?;
            self.videos.update_duration(video.id, duration).await
        }
        .await;

        match &result {
            Ok(updated) => info!(
                %video_id,
                start = window.start,
                length = ?window.length,
                duration = updated.duration,
                "video trimmed"
            ),
            Err(err) => error!(%video_id, %owner, "trim failed: {}", err),
        }
        result
    }

    /// Concatenate at least two distinct assets into a new remote object and
    /// return a share link for it. No registry rows are created or changed.
    pub async fn merge(&self, video_ids: &[String]) -> Result<String> {
        if video_ids.len() < 2 {
            return Err(AppError::Validation(TOO_FEW_VIDEOS.to_string()));
        }

        let videos = self.resolve_in_order(video_ids).await?;
        if videos.len() < 2 {
            return Err(AppError::Validation(TOO_FEW_VIDEOS.to_string()));
        }

        let mut sources: Vec<StagedFile> = Vec::with_capacity(videos.len());
        let merged = self.staging.reserve(video_core::merged_file_name());
        let merged_key = video_core::storage_key(merged.file_name());

        let result = async {
            for video in &videos {
                let staged = self.staging.reserve_unique(&video.file_name);
                let path = staged.path().to_path_buf();
                // Track before fetching so a partial download is still removed
                sources.push(staged);
                self.store.get(&video.storage_key(), &path).await?;
            }

            let inputs: Vec<PathBuf> = sources.iter().map(|s| s.path().to_path_buf()).collect();
            self.editor.concat(&inputs, merged.path()).await?;
            self.store.put(&merged_key, merged.path(), MERGED_CONTENT_TYPE).await?;
            Ok::<_, AppError>(())
        }
        .await;

        drop(sources);
        drop(merged);

        if let Err(err) = result {
            error!(count = videos.len(), "merge failed: {}", err);
            return Err(err);
        }

        let url = self.store.sign(&merged_key).await.map_err(|err| {
            error!(key = %merged_key, "share link generation failed: {}", err);
            err
        })?;
        info!(key = %merged_key, count = videos.len(), "videos merged");
        Ok(url)
    }

    /// Time-limited link to an owned asset
    pub async fn share(&self, owner: &OwnerId, video_id: Uuid) -> Result<String> {
        let video = self.owned_video(owner, video_id, "User can only share own video.").await?;

        self.store.sign(&video.storage_key()).await.map_err(|err| {
            error!(%video_id, "share link generation failed: {}", err);
            err
        })
    }

    /// Not-found is checked before ownership
    async fn owned_video(&self, owner: &OwnerId, video_id: Uuid, denied: &str) -> Result<Video> {
        let video = self
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or_else(AppError::video_not_found)?;

        if !video.is_owned_by(owner) {
            return Err(AppError::Ownership(denied.to_string()));
        }
        Ok(video)
    }

    /// Resolve ids to assets in request order, dropping unknown, malformed
    /// and repeated ids.
    async fn resolve_in_order(&self, video_ids: &[String]) -> Result<Vec<Video>> {
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = video_ids
            .iter()
            .filter_map(|raw| Uuid::parse_str(raw.trim()).ok())
            .filter(|id| seen.insert(*id))
            .collect();

        let mut found: HashMap<Uuid, Video> = self
            .videos
            .find_many(&ids)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}
