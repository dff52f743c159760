//! Naming helpers shared by the staging area and the object store

use chrono::Utc;
use uuid::Uuid;

use crate::constants::{MERGED_PREFIX, STORAGE_KEY_PREFIX};

/// Remote key for a staged file name (`videos/<file_name>`)
pub fn storage_key(file_name: &str) -> String {
    format!("{}{}", STORAGE_KEY_PREFIX, file_name)
}

/// Strip any directory components a client may have put in a filename.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match base {
        "" | "." | ".." => "upload".to_string(),
        name => name.to_string(),
    }
}

/// Unique staged name: `<unix-millis>-<8 hex>-<basename>`.
///
/// The millisecond prefix orders files by arrival; the random fragment keeps
/// concurrent requests carrying the same client filename apart.
pub fn staged_file_name(original: &str) -> String {
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        short_entropy(),
        sanitize_file_name(original)
    )
}

/// Fresh name for a concatenation output
pub fn merged_file_name() -> String {
    format!(
        "{}-{}-{}.mp4",
        MERGED_PREFIX,
        Utc::now().timestamp_millis(),
        short_entropy()
    )
}

fn short_entropy() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
