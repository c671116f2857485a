//! On-disk attachment storage for task and submission uploads.
//!
//! Files are validated against an extension whitelist before anything touches
//! the disk, stored under a timestamped sanitized name, and tracked by the
//! owning row's `file_path` column. Removal is idempotent so cleanup paths
//! can run without checking for existence first.

use crate::errors::{Error, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// File extensions accepted for uploads.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// Maximum accepted upload size (16 MiB), enforced as the HTTP body limit.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Handle to the configured upload directory.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    upload_dir: PathBuf,
}

impl AttachmentStore {
    /// Creates a store rooted at the given directory.
    pub fn new<P: Into<PathBuf>>(upload_dir: P) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Creates the upload directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(Into::into)
    }

    /// Validates and stores an uploaded file, returning the stored path.
    ///
    /// The extension check runs before any disk write. The stored name
    /// combines the current unix timestamp with the sanitized client
    /// filename to keep concurrent uploads of the same file apart.
    pub async fn save(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let extension = extension_of(filename).to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::InvalidFileType { extension });
        }

        let stored_name = format!("{}_{}", Utc::now().timestamp(), sanitize_filename(filename));
        let path = self.upload_dir.join(stored_name);
        tokio::fs::write(&path, bytes).await?;

        Ok(path.to_string_lossy().into_owned())
    }

    /// Removes a stored file. Missing files are not an error, so record
    /// cleanup can always call this unconditionally.
    pub async fn delete(&self, path: &str) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a stored file back for download, returning its basename and
    /// contents. Fails with `NotFound` when the file is gone from disk.
    pub async fn load(&self, path: &str) -> Result<(String, Vec<u8>)> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound { entity: "file" },
            _ => Error::Io(e),
        })?;

        let basename = Path::new(path)
            .file_name()
            .map_or_else(|| path.to_string(), |n| n.to_string_lossy().into_owned());

        Ok((basename, bytes))
    }
}

/// The extension after the final dot, or empty when the name has none.
fn extension_of(filename: &str) -> &str {
    filename.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Reduces a client-supplied filename to a safe basename: path components
/// are stripped, anything outside `[A-Za-z0-9._-]` becomes an underscore,
/// and leading dots are dropped.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn temp_store() -> (tempfile::TempDir, AttachmentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AttachmentStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_save_and_load_roundtrip() -> Result<()> {
        let (_dir, store) = temp_store();

        let path = store.save("report.pdf", b"pdf bytes").await?;
        assert!(Path::new(&path).exists());

        let (basename, bytes) = store.load(&path).await?;
        assert!(basename.ends_with("_report.pdf"));
        assert_eq!(bytes, b"pdf bytes");

        Ok(())
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected_before_write() {
        let (dir, store) = temp_store();

        let result = store.save("malware.exe", b"nope").await;
        assert!(matches!(
            result,
            Err(Error::InvalidFileType { extension }) if extension == "exe"
        ));

        // Nothing may have been written
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_extension_rejected() {
        let (dir, store) = temp_store();

        let result = store.save("README", b"text").await;
        assert!(matches!(result, Err(Error::InvalidFileType { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() -> Result<()> {
        let (_dir, store) = temp_store();
        let path = store.save("PHOTO.JPG", b"jpeg bytes").await?;
        assert!(Path::new(&path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() -> Result<()> {
        let (_dir, store) = temp_store();

        let path = store.save("notes.doc", b"doc bytes").await?;
        store.delete(&path).await?;
        assert!(!Path::new(&path).exists());

        // Second delete of the same path must also succeed
        store.delete(&path).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_load_missing_file_is_not_found() {
        let (dir, store) = temp_store();

        let missing = dir.path().join("1000_gone.pdf");
        let result = store.load(&missing.to_string_lossy()).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "file" })));
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\notes.doc"), "notes.doc");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my report.pdf"), "my_report.pdf");
        assert_eq!(sanitize_filename("resumen (final).docx"), "resumen__final_.docx");
    }

    #[test]
    fn test_sanitize_drops_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("..."), "file");
    }
}
