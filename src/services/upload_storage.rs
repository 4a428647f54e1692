//! Uploaded originals on disk.
//!
//! Files are named `<analysis id>.<ext>`, so concurrent uploads never
//! collide and an analysis can be found again from its id alone.

use std::io;
use std::path::{Path, PathBuf};

use super::image_decoder::ImageKind;
use crate::models::AnalysisId;

pub struct UploadStorage {
    dir: PathBuf,
}

impl UploadStorage {
    /// Open (and create if needed) the upload directory.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stored_name(id: &AnalysisId, kind: ImageKind) -> String {
        format!("{id}.{}", kind.extension())
    }

    pub async fn save(&self, id: &AnalysisId, kind: ImageKind, bytes: &[u8]) -> io::Result<String> {
        let name = Self::stored_name(id, kind);
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        tracing::debug!(file = %name, bytes = bytes.len(), "Stored upload");
        Ok(name)
    }

    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.dir.join(sanitize_filename(name))).await
    }

    /// Stored file name for `id`, if its upload is still on disk.
    pub async fn find(&self, id: &AnalysisId) -> Option<String> {
        for kind in [ImageKind::Png, ImageKind::Jpeg] {
            let name = Self::stored_name(id, kind);
            if tokio::fs::try_exists(self.dir.join(&name))
                .await
                .unwrap_or(false)
            {
                return Some(name);
            }
        }
        None
    }

    pub async fn remove(&self, name: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.dir.join(sanitize_filename(name))).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Reduce a client-supplied file name to its final path component.
pub fn sanitize_filename(filename: &str) -> String {
    // Browsers on Windows may send backslash paths
    let last = filename.rsplit(['/', '\\']).next().unwrap_or("");
    Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cat.jpg"), "cat.jpg");
        assert_eq!(sanitize_filename(".."), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[tokio::test]
    async fn test_save_find_read_remove() {
        let dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(dir.path().join("uploads")).unwrap();
        let id = AnalysisId::new();

        let name = storage.save(&id, ImageKind::Jpeg, b"data").await.unwrap();
        assert_eq!(name, format!("{id}.jpg"));
        assert_eq!(storage.find(&id).await, Some(name.clone()));
        assert_eq!(storage.read(&name).await.unwrap(), b"data");

        storage.remove(&name).await.unwrap();
        assert_eq!(storage.find(&id).await, None);
        // Removing twice is fine
        storage.remove(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_find_unknown() {
        let dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(dir.path()).unwrap();
        assert_eq!(storage.find(&AnalysisId::new()).await, None);
    }
}
