/// HTTP handlers for video-service
///
/// Everything under `/videos` sits behind the bearer auth gate.
pub mod videos;

use actix_web::web;

use crate::error::AppError;
use crate::middleware::BearerAuth;

pub use videos::{merge_videos, share_video, trim_video, upload_video};

/// Register the `/videos` routes behind `auth`
pub fn configure(auth: BearerAuth) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.service(
            web::scope("/videos")
                .wrap(auth)
                .app_data(json_config())
                .route("", web::post().to(upload_video))
                .route("/merge", web::post().to(merge_videos))
                .route("/{video_id}/trim", web::patch().to(trim_video))
                .route("/{video_id}/share", web::get().to(share_video)),
        );
    }
}

/// Malformed JSON bodies answer with a `{message}` 400
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}
