// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request-scoped temporary storage for uploaded files.
//!
//! Every request writes into its own directory under the upload root. The
//! directory is removed when the [`UploadBatch`] is dropped, and each file is
//! removed by its [`TempUpload`] guard as soon as it has been parsed.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A file persisted for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Stored name inside the batch directory
    pub filename: String,
    /// Full path to the stored file
    pub path: PathBuf,
    /// Name supplied by the client
    pub original_name: String,
}

/// Uploaded files belonging to one request.
pub struct UploadBatch {
    dir: TempDir,
    original_names: HashMap<String, String>,
}

impl UploadBatch {
    /// Create an empty batch directory under `root`.
    pub async fn create_in(root: &Path) -> io::Result<Self> {
        let root = root.to_path_buf();
        let dir = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new().prefix("batch-").tempdir_in(root)
        })
        .await
        .map_err(io::Error::other)??;

        Ok(Self {
            dir,
            original_names: HashMap::new(),
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn len(&self) -> usize {
        self.original_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_names.is_empty()
    }

    /// Persist one file. Stored names are numbered, so they never collide
    /// whatever the client called the file.
    pub async fn store(&mut self, original_name: &str, bytes: &[u8]) -> io::Result<UploadedFile> {
        let filename = format!("upload-{:06}", self.original_names.len());
        let path = self.dir.path().join(&filename);
        tokio::fs::write(&path, bytes).await?;

        self.original_names
            .insert(filename.clone(), original_name.to_string());

        Ok(UploadedFile {
            filename,
            path,
            original_name: original_name.to_string(),
        })
    }

    /// List the stored files in directory order (sorted by stored name).
    pub async fn list(&self) -> io::Result<Vec<UploadedFile>> {
        let mut entries = tokio::fs::read_dir(self.dir.path()).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let filename = entry.file_name().to_string_lossy().into_owned();
            let Some(original_name) = self.original_names.get(&filename) else {
                tracing::warn!(file = %filename, "Unexpected file in upload batch");
                continue;
            };
            files.push(UploadedFile {
                path: entry.path(),
                original_name: original_name.clone(),
                filename,
            });
        }

        files.sort_by(|a, b| a.filename.cmp(&b.filename));
        Ok(files)
    }
}

/// Owns a stored upload and deletes it when dropped.
#[derive(Debug)]
pub struct TempUpload {
    file: UploadedFile,
}

impl TempUpload {
    pub fn new(file: UploadedFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &UploadedFile {
        &self.file
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.file.path) {
            Ok(()) => tracing::debug!(file = %self.file.filename, "Removed temporary upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                file = %self.file.filename,
                error = %e,
                "Failed to remove temporary upload"
            ),
        }
    }
}

/// Create the upload root if it does not exist yet.
pub async fn ensure_upload_root(root: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(root).await
}

/// Remove everything left under the upload root. Returns the number of
/// entries removed.
pub async fn clear_upload_root(root: &Path) -> io::Result<usize> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let result = if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(&path).await
        } else {
            tokio::fs::remove_file(&path).await
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload"),
        }
    }
    Ok(removed)
}
