/// Video handlers - HTTP endpoints for the asset lifecycle
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use video_core::constants::UPLOAD_FIELD_NAME;

use crate::error::{AppError, Result};
use crate::models::{MergeRequest, MergeResponse, OwnerId, ShareResponse, TrimRequest};
use crate::services::{IncomingUpload, VideoLifecycle};

const NO_FILE: &str = "No file uploaded.";
const UNEXPECTED_FIELD: &str = "Unexpected field. Expected \"file\" field.";

/// Upload a video
/// POST /videos (multipart field `file`)
pub async fn upload_video(
    lifecycle: web::Data<VideoLifecycle>,
    owner: OwnerId,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let upload = receive_upload(&lifecycle, &mut payload)
        .await?
        .ok_or_else(|| AppError::Validation(NO_FILE.to_string()))?;

    let video = lifecycle.upload(&owner, upload).await?;
    Ok(HttpResponse::Ok().json(video))
}

/// Trim an owned video in place
/// PATCH /videos/{video_id}/trim
pub async fn trim_video(
    lifecycle: web::Data<VideoLifecycle>,
    owner: OwnerId,
    video_id: web::Path<String>,
    req: web::Json<TrimRequest>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&video_id)?;
    let video = lifecycle.trim(&owner, video_id, &req).await?;
    Ok(HttpResponse::Ok().json(video))
}

/// Merge two or more videos into a new shareable object
/// POST /videos/merge
pub async fn merge_videos(
    lifecycle: web::Data<VideoLifecycle>,
    _owner: OwnerId,
    req: web::Json<MergeRequest>,
) -> Result<HttpResponse> {
    let video_ids: Vec<String> = match &req.video_ids {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    };

    let url = lifecycle.merge(&video_ids).await?;
    Ok(HttpResponse::Ok().json(MergeResponse {
        message: "Video merged successfully".to_string(),
        url,
    }))
}

/// Time-limited link to an owned video
/// GET /videos/{video_id}/share
pub async fn share_video(
    lifecycle: web::Data<VideoLifecycle>,
    owner: OwnerId,
    video_id: web::Path<String>,
) -> Result<HttpResponse> {
    let video_id = parse_video_id(&video_id)?;
    let url = lifecycle.share(&owner, video_id).await?;
    Ok(HttpResponse::Ok().json(ShareResponse { url }))
}

/// Ids that are not UUIDs cannot name an asset
fn parse_video_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::video_not_found())
}

/// Stream the single `file` part into staging. Text parts are skipped; a
/// file part under any other name is rejected. The declared type is checked
/// before any bytes are written and writing stops as soon as the size limit
/// is passed. Staged bytes are removed if anything fails part-way.
async fn receive_upload(
    lifecycle: &VideoLifecycle,
    payload: &mut Multipart,
) -> Result<Option<IncomingUpload>> {
    let mut received: Option<IncomingUpload> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);

        let Some(file_name) = file_name else {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        };

        if field.name() != Some(UPLOAD_FIELD_NAME) || received.is_some() {
            return Err(AppError::Validation(UNEXPECTED_FIELD.to_string()));
        }

        let declared = field.content_type().map(mime::Mime::essence_str);
        let content_type = lifecycle.accept_content_type(declared)?;
        let staged = lifecycle.staging().reserve_unique(&file_name);

        let mut out = tokio::fs::File::create(staged.path()).await?;
        let mut size: u64 = 0;
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            size += chunk.len() as u64;
            lifecycle.check_size(size)?;
            out.write_all(&chunk).await?;
        }
        out.flush().await?;

        tracing::debug!(file_name = %staged.file_name(), size, "upload staged");
        received = Some(IncomingUpload {
            file: staged,
            content_type: Some(content_type),
            size,
        });
    }

    // A zero-byte part counts as no file uploaded
    Ok(received.filter(|upload| upload.size > 0))
}
