//! Image upload storage.
//!
//! Uploaded files are written under the configured upload directory with a
//! UUID-prefixed name and served statically at `/uploads/<name>`. The
//! database stores bare filenames (comma-joined for multi-image products);
//! responses rewrite them to absolute URLs element-wise.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The uploaded part is not an image.
    #[error("only image uploads are accepted")]
    NotAnImage,

    /// Filesystem error while writing the upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem-backed store for uploaded product images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    base_url: String,
}

impl ImageStore {
    /// Create a new image store.
    ///
    /// `base_url` is used to build absolute URLs; a trailing slash is
    /// tolerated.
    #[must_use]
    pub fn new(dir: PathBuf, base_url: &str) -> Self {
        Self {
            dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The directory uploads are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Store one uploaded image, returning the generated filename.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::NotAnImage` unless the declared content type is
    /// `image/*`. Returns `UploadError::Io` if the write fails.
    pub async fn save(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<String, UploadError> {
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(UploadError::NotAnImage);
        }

        let stored = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        tokio::fs::write(self.dir.join(&stored), data).await?;

        Ok(stored)
    }

    /// Delete a stored image, best-effort.
    ///
    /// Filesystem errors are logged and swallowed - image cleanup must
    /// never abort the owning request. External URLs (entries starting
    /// with `http`) are ignored.
    pub async fn remove(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() || name.starts_with("http") {
            return;
        }

        let path = self.dir.join(sanitize_filename(name));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "failed to delete image file");
            }
        }
    }

    /// Delete every image in a comma-joined list, best-effort.
    pub async fn remove_all(&self, comma_list: &str) {
        for name in comma_list.split(',') {
            self.remove(name).await;
        }
    }

    /// Rewrite one stored filename to an absolute URL.
    ///
    /// Entries that already look like URLs pass through untouched.
    #[must_use]
    pub fn absolute_url(&self, name: &str) -> String {
        let name = name.trim();
        if name.starts_with("http") {
            name.to_string()
        } else {
            format!("{}/uploads/{name}", self.base_url)
        }
    }

    /// Rewrite a comma-joined image list to absolute URLs, element-wise.
    /// Ordering is preserved; an empty list stays empty.
    #[must_use]
    pub fn rewrite_image_list(&self, comma_list: &str) -> String {
        if comma_list.is_empty() {
            return String::new();
        }

        comma_list
            .split(',')
            .map(|name| self.absolute_url(name))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Reduce a client-supplied filename to a safe final path component.
fn sanitize_filename(name: &str) -> String {
    let component = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace(',', "_");

    if component.is_empty() || component == "." || component == ".." {
        "image".to_string()
    } else {
        component
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_at(dir: &Path) -> ImageStore {
        ImageStore::new(dir.to_path_buf(), "http://localhost:8080/")
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("photo.png"), "photo.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("a\\b\\c.jpg"), "c.jpg");
        assert_eq!(sanitize_filename(".."), "image");
        assert_eq!(sanitize_filename(""), "image");
        // Commas would corrupt the stored comma-joined list
        assert_eq!(sanitize_filename("a,b.png"), "a_b.png");
    }

    #[test]
    fn test_absolute_url() {
        let store = store_at(Path::new("uploads"));
        assert_eq!(
            store.absolute_url("cat.png"),
            "http://localhost:8080/uploads/cat.png"
        );
        // Pre-existing URLs pass through
        assert_eq!(
            store.absolute_url("https://cdn.example.com/cat.png"),
            "https://cdn.example.com/cat.png"
        );
    }

    #[test]
    fn test_rewrite_image_list() {
        let store = store_at(Path::new("uploads"));
        assert_eq!(store.rewrite_image_list(""), "");
        assert_eq!(
            store.rewrite_image_list("a.png,b.png"),
            "http://localhost:8080/uploads/a.png,http://localhost:8080/uploads/b.png"
        );
        assert_eq!(
            store.rewrite_image_list("a.png,http://x.test/b.png"),
            "http://localhost:8080/uploads/a.png,http://x.test/b.png"
        );
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        let name = store
            .save("photo.png", Some("image/png"), b"fake-bytes")
            .await
            .unwrap();
        assert!(name.ends_with("-photo.png"));
        assert!(dir.path().join(&name).exists());

        store.remove(&name).await;
        assert!(!dir.path().join(&name).exists());

        // Removing again (or a missing file) is a quiet no-op
        store.remove(&name).await;
    }

    #[tokio::test]
    async fn test_save_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        let result = store.save("notes.txt", Some("text/plain"), b"hello").await;
        assert!(matches!(result, Err(UploadError::NotAnImage)));

        let result = store.save("mystery", None, b"hello").await;
        assert!(matches!(result, Err(UploadError::NotAnImage)));
    }

    #[tokio::test]
    async fn test_remove_ignores_external_urls() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());
        // Must not panic or touch the filesystem
        store.remove("http://cdn.example.com/cat.png").await;
    }
}
