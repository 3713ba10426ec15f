//! Request-side orchestration.
//!
//! Handlers parse HTTP input and hand it to these functions, which check
//! authorization against the owned resource, validate through
//! `joba_core`, and write through the repositories. Each mutating
//! operation runs in a single transaction.

pub mod applications;
pub mod identity;
pub mod notices;
pub mod postings;
pub mod profiles;
pub mod questions;

use joba_core::error::CoreError;
use joba_core::types::DbId;
use joba_core::upload::{validate_file_size, UploadKind};
use joba_storage::FileStorage;
use sqlx::PgPool;

use crate::error::AppResult;

/// Everything an engine operation needs, borrowed from `AppState`.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub pool: &'a PgPool,
    pub storage: &'a dyn FileStorage,
    pub max_file_size_bytes: u64,
}

/// A file received in a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name; may be empty.
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl EngineContext<'_> {
    /// Reject a file over the configured size limit.
    pub fn check_size(&self, file: &UploadedFile) -> Result<(), CoreError> {
        validate_file_size(&file.filename, file.size(), self.max_file_size_bytes)
    }

    /// Upload one already size-checked file and return its public URL.
    pub async fn upload(&self, kind: UploadKind, file: UploadedFile) -> AppResult<String> {
        let key = kind.object_key(&file.filename);
        let url = self
            .storage
            .put(&key, file.bytes, file.content_type.as_deref())
            .await?;
        Ok(url)
    }
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::NotFound { entity, id }
}
