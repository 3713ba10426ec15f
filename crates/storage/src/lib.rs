//! Object storage for uploaded files.
//!
//! Callers depend on the [`FileStorage`] trait only. [`S3Storage`] talks to
//! any S3-compatible endpoint; [`MemoryStorage`] keeps objects in process
//! and is what the test suites inject.

pub mod error;
pub mod memory;
pub mod s3;

use async_trait::async_trait;

pub use error::StorageError;
pub use memory::MemoryStorage;
pub use s3::{S3Storage, StorageConfig};

/// Write-only blob store returning a public URL per object.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` under `key` and return the URL the object is served from.
    async fn put(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<String, StorageError>;
}
