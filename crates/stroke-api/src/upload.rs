//! Scratch storage for uploaded videos.
//!
//! An upload lives on disk only for the duration of one request. The file is
//! removed when its [`ScratchUpload`] is dropped, whichever way the handler
//! exits.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use axum::extract::multipart::Field;
use scopeguard::ScopeGuard;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and only `[A-Za-z0-9._-]` survive.
/// Leading dots are stripped so the result is never hidden or relative.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

fn remove_scratch(path: PathBuf) {
    match std::fs::remove_file(&path) {
        Ok(()) => debug!(path = %path.display(), "Removed scratch upload"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove scratch upload"),
    }
}

/// A video written to the scratch directory, deleted on drop.
pub struct ScratchUpload {
    path: ScopeGuard<PathBuf, fn(PathBuf)>,
    original_name: String,
    size: u64,
}

impl ScratchUpload {
    /// Reserve a unique path under `dir` for `original_name`.
    pub fn create(dir: &Path, original_name: &str) -> Self {
        let safe = secure_filename(original_name);
        let file_name = format!("{}_{}", Uuid::new_v4().simple(), safe);
        let path: PathBuf = dir.join(file_name);

        Self {
            path: scopeguard::guard(path, remove_scratch as fn(PathBuf)),
            original_name: original_name.to_string(),
            size: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Stream a multipart field to disk chunk by chunk.
    pub async fn write_field(&mut self, mut field: Field<'_>, limit_label: &str) -> ApiResult<u64> {
        let mut file = File::create(&*self.path).await?;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::from_multipart(e, limit_label))?
        {
            file.write_all(&chunk).await?;
            self.size += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("serve.mp4"), "serve.mp4");
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\rally.MOV"), "rally.MOV");
        assert_eq!(secure_filename("my forehand (1).mp4"), "my_forehand_1.mp4");
        assert_eq!(secure_filename(".hidden.avi"), "hidden.avi");
        assert_eq!(secure_filename("視頻.mp4"), "mp4");
    }

    #[tokio::test]
    async fn test_scratch_file_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let upload = ScratchUpload::create(dir.path(), "rally.mp4");
        tokio::fs::write(upload.path(), b"not really a video").await.unwrap();

        let path = upload.path().to_path_buf();
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("_rally.mp4"));
        assert_eq!(upload.size(), 0);
        assert_eq!(upload.original_name(), "rally.mp4");

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_without_write_is_quiet() {
        let dir = TempDir::new().unwrap();
        let upload = ScratchUpload::create(dir.path(), "volley.webm");
        drop(upload);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_names_are_unique() {
        let dir = TempDir::new().unwrap();
        let a = ScratchUpload::create(dir.path(), "same.mp4");
        let b = ScratchUpload::create(dir.path(), "same.mp4");
        assert_ne!(a.path(), b.path());
    }
}
