//! In-memory document store.

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::extract::extract_pdf_text;
use crate::models::{DocumentText, FileSummary, StoredFile, Upload};

const PDF_MIME: &str = "application/pdf";

/// Uploaded documents held as text, in upload order.
#[derive(Debug)]
pub struct FileStore {
    files: RwLock<Vec<StoredFile>>,
    max_bytes: usize,
}

impl FileStore {
    /// Create an empty store accepting uploads up to `max_bytes`.
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self { files: RwLock::new(Vec::new()), max_bytes }
    }

    /// Largest accepted upload.
    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Check an upload before any parsing.
    ///
    /// # Errors
    ///
    /// Rejects empty bodies, oversize bodies and MIME types other than PDF or `text/*`.
    pub fn validate(&self, upload: &Upload) -> Result<(), StoreError> {
        if upload.bytes.is_empty() {
            return Err(StoreError::Empty);
        }
        if upload.bytes.len() > self.max_bytes {
            return Err(StoreError::TooLarge { size: upload.bytes.len(), limit: self.max_bytes });
        }
        if !is_supported(&upload.mime_type) {
            return Err(StoreError::UnsupportedType(upload.mime_type.clone()));
        }
        Ok(())
    }

    /// Validate, extract text and store an upload.
    ///
    /// PDF parsing runs on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns validation failures from [`FileStore::validate`] and PDF extraction errors.
    pub async fn insert(&self, upload: Upload) -> Result<StoredFile, StoreError> {
        self.validate(&upload)?;

        let size = upload.bytes.len();
        let content = if essence(&upload.mime_type) == PDF_MIME {
            let bytes = upload.bytes;
            tokio::task::spawn_blocking(move || extract_pdf_text(&bytes)).await??
        } else {
            String::from_utf8_lossy(&upload.bytes).into_owned()
        };

        let id = Uuid::new_v4();
        let uploaded_at = Utc::now();
        let file = StoredFile {
            id,
            filename: format!("{}-{}", uploaded_at.timestamp_millis(), sanitize(&upload.name)),
            original_name: upload.name,
            mime_type: upload.mime_type,
            size,
            content,
            uploaded_at,
        };

        tracing::info!(id = %file.id, name = %file.original_name, size = file.size, "Stored file");
        self.files.write().await.push(file.clone());
        Ok(file)
    }

    /// Every file without its content, oldest first.
    pub async fn list(&self) -> Vec<FileSummary> {
        self.files.read().await.iter().map(FileSummary::from).collect()
    }

    /// One file with its content.
    pub async fn get(&self, id: Uuid) -> Option<StoredFile> {
        self.files.read().await.iter().find(|f| f.id == id).cloned()
    }

    /// Remove a file. Returns false if it was not present.
    pub async fn delete(&self, id: Uuid) -> bool {
        let mut files = self.files.write().await;
        let before = files.len();
        files.retain(|f| f.id != id);
        let removed = files.len() != before;
        if removed {
            tracing::info!(%id, "Deleted file");
        }
        removed
    }

    /// Document texts for chat context; all files when `ids` is empty.
    pub async fn texts(&self, ids: &[Uuid]) -> Vec<DocumentText> {
        self.files
            .read()
            .await
            .iter()
            .filter(|f| ids.is_empty() || ids.contains(&f.id))
            .map(DocumentText::from)
            .collect()
    }
}

/// MIME type without parameters, lower-cased.
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

fn is_supported(mime: &str) -> bool {
    let essence = essence(mime);
    essence == PDF_MIME || essence.starts_with("text/")
}

/// Keep a file name safe for use as a stored name.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    if cleaned.is_empty() { "upload".to_string() } else { cleaned }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_upload(name: &str, body: &str) -> Upload {
        Upload { name: name.into(), mime_type: "text/plain".into(), bytes: body.as_bytes().to_vec() }
    }

    #[tokio::test]
    async fn test_insert_list_get_delete() {
        let store = FileStore::new(1024);
        let a = store.insert(text_upload("notes one.txt", "alpha")).await.unwrap();
        let b = store.insert(text_upload("two.txt", "beta")).await.unwrap();

        assert!(a.filename.ends_with("notes_one.txt"));
        let names: Vec<_> = store.list().await.into_iter().map(|f| f.original_name).collect();
        assert_eq!(names, vec!["notes one.txt", "two.txt"]);
        assert_eq!(store.get(b.id).await.unwrap().content, "beta");

        assert!(store.delete(a.id).await);
        assert!(!store.delete(a.id).await);
        assert!(store.get(a.id).await.is_none());
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_texts_filter_by_id() {
        let store = FileStore::new(1024);
        let a = store.insert(text_upload("a.txt", "alpha")).await.unwrap();
        store.insert(text_upload("b.txt", "beta")).await.unwrap();

        assert_eq!(store.texts(&[]).await.len(), 2);
        let only = store.texts(&[a.id]).await;
        assert_eq!(only, vec![DocumentText { name: "a.txt".into(), text: "alpha".into() }]);
    }

    #[tokio::test]
    async fn test_rejections_happen_before_storage() {
        let store = FileStore::new(4);

        let empty = Upload { name: "e.txt".into(), mime_type: "text/plain".into(), bytes: vec![] };
        assert!(matches!(store.insert(empty).await, Err(StoreError::Empty)));

        let big = text_upload("big.txt", "too large");
        assert!(matches!(store.insert(big).await, Err(StoreError::TooLarge { size: 9, limit: 4 })));

        let image = Upload { name: "i.png".into(), mime_type: "image/png".into(), bytes: vec![1, 2] };
        assert!(matches!(store.insert(image).await, Err(StoreError::UnsupportedType(_))));

        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_upload_stores_extracted_text() {
        let bytes = crate::extract::pdf::tests::pdf_with_pages(&["Co-word analysis"]);
        let size = bytes.len();
        let store = FileStore::new(size);

        let pdf = Upload { name: "paper.pdf".into(), mime_type: "application/pdf".into(), bytes };
        let file = store.insert(pdf).await.unwrap();
        assert_eq!(file.size, size);
        assert!(file.content.contains("Co-word analysis"));

        let broken =
            Upload { name: "bad.pdf".into(), mime_type: "application/pdf".into(), bytes: b"%PDF-no".to_vec() };
        assert!(matches!(store.insert(broken).await, Err(StoreError::Extract(_))));
        assert_eq!(store.list().await.len(), 1);
    }

    #[test]
    fn test_mime_essence() {
        assert!(is_supported("text/markdown; charset=utf-8"));
        assert!(is_supported("Application/PDF"));
        assert!(!is_supported("application/json"));
    }
}
