//! In-process backend used by tests and local runs without object storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{FileStorage, StorageError};

/// An object held by [`MemoryStorage`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every upload fails.
    pub fn failing() -> Self {
        let storage = Self::default();
        storage.fail_uploads.store(true, Ordering::SeqCst);
        storage
    }

    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.objects.lock().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload {
                key: key.to_string(),
                message: "memory storage is configured to fail".into(),
            });
        }

        self.objects.lock().await.insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.map(str::to_string),
            },
        );
        Ok(format!("memory://{key}"))
    }
}
