/// Video repository - database operations for videos
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{NewVideo, Video};

#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Insert a new asset row
    async fn create(&self, video: NewVideo) -> Result<Video>;

    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<Video>>;

    /// Fetch every existing asset among `video_ids` (order unspecified)
    async fn find_many(&self, video_ids: &[Uuid]) -> Result<Vec<Video>>;

    /// Record a re-measured duration after a trim
    async fn update_duration(&self, video_id: Uuid, duration: f64) -> Result<Video>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const VIDEO_COLUMNS: &str =
    "id, user_id, file_name, size, duration, mime_type, created_at, updated_at";

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create(&self, video: NewVideo) -> Result<Video> {
        let query = format!(
            "INSERT INTO videos \
             (id, user_id, file_name, size, duration, mime_type, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW()) \
             RETURNING {VIDEO_COLUMNS}"
        );

        let created = sqlx::query_as::<_, Video>(&query)
            .bind(Uuid::new_v4())
            .bind(video.user_id.as_str())
            .bind(&video.file_name)
            .bind(video.size)
            .bind(video.duration)
            .bind(&video.mime_type)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn find_by_id(&self, video_id: Uuid) -> Result<Option<Video>> {
        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");

        let video = sqlx::query_as::<_, Video>(&query)
            .bind(video_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(video)
    }

    async fn find_many(&self, video_ids: &[Uuid]) -> Result<Vec<Video>> {
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ANY($1)");

        let videos = sqlx::query_as::<_, Video>(&query)
            .bind(video_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(videos)
    }

    async fn update_duration(&self, video_id: Uuid, duration: f64) -> Result<Video> {
        let query = format!(
            "UPDATE videos SET duration = $2, updated_at = NOW() WHERE id = $1 \
             RETURNING {VIDEO_COLUMNS}"
        );

        sqlx::query_as::<_, Video>(&query)
            .bind(video_id)
            .bind(duration)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(AppError::video_not_found)
    }
}
