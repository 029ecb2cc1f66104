use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::StorageError;
use super::BlobStore;

/// In-memory blob store for tests.
///
/// `fail_puts` simulates an unreachable store so callers can exercise both
/// the fatal raw-upload path and the swallowed report-upload path.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<(String, String), Vec<u8>>>,
    fail_puts: AtomicBool,
    fail_container: RwLock<Option<String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Fails puts only into the named container.
    pub fn set_fail_container(&self, container: Option<&str>) {
        *self.fail_container.write() = container.map(str::to_string);
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.read().len()
    }

    /// Names stored under a container, unsorted.
    pub fn names_in(&self, container: &str) -> Vec<String> {
        self.blobs
            .read()
            .keys()
            .filter(|(c, _)| c == container)
            .map(|(_, n)| n.clone())
            .collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn list(&self, container: &str) -> Result<Vec<String>, StorageError> {
        Ok(self.names_in(container))
    }

    async fn exists(&self, container: &str, name: &str) -> Result<bool, StorageError> {
        Ok(self
            .blobs
            .read()
            .contains_key(&(container.to_string(), name.to_string())))
    }

    async fn get(&self, container: &str, name: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .read()
            .get(&(container.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                container: container.to_string(),
                name: name.to_string(),
            })
    }

    async fn put(
        &self,
        container: &str,
        name: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        let container_blocked = self
            .fail_container
            .read()
            .as_deref()
            .is_some_and(|c| c == container);
        if self.fail_puts.load(Ordering::SeqCst) || container_blocked {
            return Err(StorageError::Api {
                status: 503,
                container: container.to_string(),
                name: name.to_string(),
            });
        }

        self.blobs
            .write()
            .insert((container.to_string(), name.to_string()), data);
        Ok(())
    }
}
