use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::error::ApiError;

/// Upload size ceiling. Kept in sync with the multipart field limit on the
/// submit form.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";

/// A file that passed the ingestion gate and now exists on durable storage.
///
/// `stored_name` is relative to the store root; callers only ever see
/// `original_name`.
#[derive(Debug)]
pub struct IngestedFile {
    pub original_name: String,
    pub stored_name: String,
    pub size_bytes: usize,
}

/// File-backed submission storage rooted at an explicit directory.
///
/// The root is passed in at construction so tests can point each instance at
/// a throwaway directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens the store, creating the root directory if it does not exist yet.
    pub async fn open(root: PathBuf) -> Result<Self, std::io::Error> {
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Validates and persists one uploaded file.
    ///
    /// Nothing touches disk unless the content type is exactly PDF and the
    /// payload fits the ceiling; the whole payload is already buffered, so a
    /// stream aborted mid-upload never materializes a partial file.
    pub async fn ingest(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        contents: &[u8],
    ) -> Result<IngestedFile, ApiError> {
        if content_type != Some(PDF_MIME) {
            return Err(ApiError::RejectedFile("only PDF files are allowed"));
        }

        if contents.len() > MAX_UPLOAD_BYTES {
            return Err(ApiError::RejectedFile("file too large"));
        }

        let stored_name = unique_name(original_name);
        fs::write(self.root.join(&stored_name), contents).await?;

        Ok(IngestedFile {
            original_name: original_name.to_owned(),
            stored_name,
            size_bytes: contents.len(),
        })
    }

    /// Compensating delete for a file whose logical operation failed after
    /// the bytes already landed on disk.
    pub async fn discard(&self, stored_name: &str) {
        if let Err(error) = fs::remove_file(self.root.join(stored_name)).await {
            tracing::warn!(stored_name, %error, "failed to discard ingested file");
        }
    }

    pub fn resolve(&self, stored_name: &str) -> PathBuf {
        self.root.join(stored_name)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Builds a destination name that is unique even for concurrent uploads of
/// identically named files within the same millisecond.
fn unique_name(original_name: &str) -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(8);

    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        token,
        sanitize_name(original_name)
    )
}

/// Keeps only the final path component of the client-supplied name and
/// collapses whitespace runs to hyphens, so the stored name can never carry a
/// traversal sequence.
fn sanitize_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    let collapsed = base.split_whitespace().collect::<Vec<_>>().join("-");

    if collapsed.is_empty() {
        "upload".to_owned()
    } else {
        collapsed
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_name("my homework 1.pdf"), "my-homework-1.pdf");
        assert_eq!(sanitize_name("a\t b   c.pdf"), "a-b-c.pdf");
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("..\\..\\boot.ini"), "boot.ini");
        assert_eq!(sanitize_name("dir/inner name.pdf"), "inner-name.pdf");
    }

    #[test]
    fn sanitize_falls_back_for_empty_names() {
        assert_eq!(sanitize_name(""), "upload");
        assert_eq!(sanitize_name("   "), "upload");
    }

    #[test]
    fn unique_names_differ_for_identical_input() {
        let a = unique_name("report.pdf");
        let b = unique_name("report.pdf");
        assert_ne!(a, b);
        assert!(a.ends_with("report.pdf"));
    }

    #[tokio::test]
    async fn ingest_writes_pdf_and_reports_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).await.unwrap();

        let ingested = store
            .ingest("essay.pdf", Some(PDF_MIME), b"%PDF-1.4 fake")
            .await
            .unwrap();

        assert_eq!(ingested.original_name, "essay.pdf");
        assert_eq!(ingested.size_bytes, 13);

        let on_disk = tokio::fs::read(store.resolve(&ingested.stored_name))
            .await
            .unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 fake");
    }

    #[tokio::test]
    async fn ingest_rejects_non_pdf_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).await.unwrap();

        let result = store
            .ingest("notes.txt", Some("text/plain"), b"plain text")
            .await;
        assert!(matches!(result, Err(ApiError::RejectedFile(_))));

        let result = store.ingest("mystery.bin", None, b"??").await;
        assert!(matches!(result, Err(ApiError::RejectedFile(_))));

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn discard_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().to_path_buf()).await.unwrap();

        let ingested = store
            .ingest("essay.pdf", Some(PDF_MIME), b"%PDF-1.4")
            .await
            .unwrap();
        store.discard(&ingested.stored_name).await;

        assert!(!store.resolve(&ingested.stored_name).exists());
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");

        FileStore::open(root.clone()).await.unwrap();
        FileStore::open(root.clone()).await.unwrap();

        assert!(root.is_dir());
    }
}
