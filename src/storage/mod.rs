//! Durable byte store for raw uploads and generated reports.
//!
//! Keyed by container + name. The pipeline treats this as an external
//! collaborator: raw-upload failures are fatal to a job, report-upload
//! failures are logged and swallowed.

pub mod azure;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use azure::AzureBlobStore;
pub use error::StorageError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryBlobStore;

use async_trait::async_trait;

/// Extensions recognized as image blobs (also the upload allow-list).
pub const IMAGE_EXTENSIONS: [&str; 6] = [".jpg", ".jpeg", ".png", ".webp", ".bmp", ".tiff"];

/// Container + name addressed byte store.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Lists blob names in a container.
    async fn list(&self, container: &str) -> Result<Vec<String>, StorageError>;

    /// Returns `true` if the named blob exists.
    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError>;

    /// Downloads a blob's bytes.
    async fn get(&self, container: &str, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Uploads (or overwrites) a blob.
    async fn put(
        &self,
        container: &str,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Returns `true` if the filename carries a recognized image extension.
pub fn has_image_extension(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Lists image blobs in a container (names filtered by extension).
pub async fn find_images<S: BlobStore + ?Sized>(
    store: &S,
    container: &str,
) -> Result<Vec<String>, StorageError> {
    let names = store.list(container).await?;
    Ok(names
        .into_iter()
        .filter(|n| has_image_extension(n))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_filter() {
        assert!(has_image_extension("photo.JPG"));
        assert!(has_image_extension("scan.tiff"));
        assert!(!has_image_extension("notes.txt"));
        assert!(!has_image_extension("archive.pdf"));
    }

    #[tokio::test]
    async fn test_find_images_filters_non_images() {
        let store = MemoryBlobStore::new();
        store
            .put("shots", "a.png", vec![1], "image/png")
            .await
            .unwrap();
        store
            .put("shots", "b.txt", vec![2], "text/plain")
            .await
            .unwrap();

        let mut images = find_images(&store, "shots").await.unwrap();
        images.sort();
        assert_eq!(images, vec!["a.png".to_string()]);
    }
}
