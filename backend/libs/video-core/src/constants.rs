//! Video asset constants

/// MIME types accepted on upload (declared type, not sniffed)
pub const ALLOWED_MIME_TYPES: &[&str] = &["video/mp4", "video/avi", "video/mov", "video/mkv"];

/// Human-readable list used in validation messages
pub const ALLOWED_TYPES_LABEL: &str = "mp4, avi, mov, mkv";

/// Prefix under which every asset is stored in the bucket
pub const STORAGE_KEY_PREFIX: &str = "videos/";

/// Share links are valid for 5 minutes
pub const SHARE_URL_EXPIRY_SECS: u64 = 5 * 60;

/// Content type of concatenated outputs
pub const MERGED_CONTENT_TYPE: &str = "video/mp4";

/// Prefix of the local output produced by a trim
pub const TRIMMED_PREFIX: &str = "trimmed-";

/// Base name of merged outputs (`merged-<millis>-<hex>.mp4`)
pub const MERGED_PREFIX: &str = "merged";

/// Multipart field carrying the uploaded file
pub const UPLOAD_FIELD_NAME: &str = "file";

/// One megabyte as used by the upload size limit
pub const BYTES_PER_MB: u64 = 1024 * 1024;
