//! Local staging area for in-flight files
//!
//! Every file a request stages is owned by a [`StagedFile`] guard. Dropping
//! the guard removes the file, so every exit path of a flow (success, early
//! validation return, `?` on a collaborator failure) leaves nothing behind.

use std::io;
use std::path::{Path, PathBuf};

use video_core::constants::TRIMMED_PREFIX;

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Use `root` as the scratch directory, creating it when missing
    pub fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Claim a path for `file_name`. Nothing is created on disk yet; the
    /// guard removes whatever ends up there.
    pub fn reserve(&self, file_name: impl Into<String>) -> StagedFile {
        let file_name = file_name.into();
        StagedFile {
            path: self.root.join(&file_name),
            file_name,
        }
    }

    /// Claim a fresh, collision-free path derived from a client or asset name
    pub fn reserve_unique(&self, original: &str) -> StagedFile {
        self.reserve(video_core::staged_file_name(original))
    }
}

/// A staged file removed from disk when dropped
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    file_name: String,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Sibling path for a trim output (`trimmed-<file_name>`)
    pub fn trimmed_sibling(&self) -> StagedFile {
        let file_name = format!("{}{}", TRIMMED_PREFIX, self.file_name);
        let path = self
            .path
            .parent()
            .map(|dir| dir.join(&file_name))
            .unwrap_or_else(|| PathBuf::from(&file_name));
        StagedFile { path, file_name }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Size on disk in bytes
    pub fn size(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "staged file removed"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "failed to remove staged file: {}", err)
            }
        }
    }
}
