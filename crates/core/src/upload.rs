//! Upload size limits and storage key generation.

use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;

/// Default maximum size of a single uploaded file (1 GiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 1024 * 1024 * 1024;

/// Reject files larger than `max_bytes`, naming the file.
pub fn validate_file_size(filename: &str, size: u64, max_bytes: u64) -> Result<(), CoreError> {
    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File '{filename}' is {size} bytes, exceeding the {max_bytes} byte limit"
        )));
    }
    Ok(())
}

/// The extension of `filename` including the leading dot, or an empty string.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => String::new(),
    }
}

/// What an uploaded file is for; determines its storage key prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    PostingImage,
    ApplicationAttachment,
    Avatar(DbId),
    Cover(DbId),
    Timetable(DbId),
}

impl UploadKind {
    /// A fresh, collision-free object key for a file of this kind.
    pub fn object_key(self, filename: &str) -> String {
        let ext = file_extension(filename);
        let id = Uuid::new_v4();
        match self {
            Self::PostingImage => format!("posts/images/{id}{ext}"),
            Self::ApplicationAttachment => format!("applications/attachments/{id}{ext}"),
            Self::Avatar(user_id) => format!("profiles/{user_id}/avatar_{id}{ext}"),
            Self::Cover(user_id) => format!("profiles/{user_id}/cover_{id}{ext}"),
            Self::Timetable(user_id) => format!("profiles/{user_id}/timetable_{id}{ext}"),
        }
    }
}
