/// Service layer for video assets
///
/// - staging: scoped local scratch files
/// - storage: remote object store seam (S3)
/// - media: ffprobe / ffmpeg toolkit
/// - trim: trim request rules
/// - lifecycle: upload / trim / merge / share coordinator
pub mod lifecycle;
pub mod media;
pub mod staging;
pub mod storage;
pub mod trim;

pub use lifecycle::{IncomingUpload, VideoLifecycle};
pub use media::{FfmpegToolkit, MediaEditor, MediaInspector};
pub use staging::{StagedFile, StagingArea};
pub use storage::{ObjectStore, S3ObjectStore};
pub use trim::{plan_trim, TrimParams, TrimWindow};
