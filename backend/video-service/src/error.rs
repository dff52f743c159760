/// Error types for video-service
///
/// Client-correctable failures (validation, ownership, not-found, auth) are
/// reported as `{"message": ...}`; collaborator failures are reported as
/// `{"error": ...}` with the collaborator's message passed through verbatim.
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    /// Acting owner differs from the asset owner. Reported as 400, not 403,
    /// so clients can tell it apart from a rejected credential.
    #[error("{0}")]
    Ownership(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Storage(String),

    #[error("{0}")]
    Media(String),

    #[error("{0}")]
    Database(String),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn video_not_found() -> Self {
        AppError::NotFound("Video not found.".to_string())
    }

    /// True for failures raised by a collaborator rather than by a check
    pub fn is_unexpected(&self) -> bool {
        self.status_code() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Ownership(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::FORBIDDEN,
            AppError::Storage(_)
            | AppError::Media(_)
            | AppError::Database(_)
            | AppError::Io(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = self.to_string();

        if self.is_unexpected() {
            HttpResponse::build(status).json(ErrorResponse { error: message })
        } else {
            HttpResponse::build(status).json(MessageResponse { message })
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<s3_utils::S3Error> for AppError {
    fn from(err: s3_utils::S3Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn test_client_errors_use_message_field() {
        let (status, body) =
            body_json(AppError::Validation("Invalid start or end times.".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid start or end times.");

        let (status, body) =
            body_json(AppError::Ownership("User can only share own video.".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User can only share own video.");

        let (status, body) = body_json(AppError::video_not_found()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Video not found.");

        let (status, body) = body_json(AppError::Unauthorized).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Unauthorized");
    }

    #[actix_web::test]
    async fn test_collaborator_errors_pass_message_through() {
        let (status, body) = body_json(AppError::Storage("Unable to upload to s3".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Unable to upload to s3");
        assert!(body.get("message").is_none());

        let (_, body) = body_json(AppError::Media("Error processing video".into())).await;
        assert_eq!(body["error"], "Error processing video");
    }
}
