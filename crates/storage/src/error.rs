use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or failed the upload.
    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    /// Storage is misconfigured (missing bucket, bad endpoint).
    #[error("Storage configuration error: {0}")]
    Config(String),
}
