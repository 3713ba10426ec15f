use crate::types::DbId;

/// Domain error shared by every crate in the workspace.
///
/// The API layer maps each variant to a stable HTTP status and error code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The resource is absent, or hidden from the caller for privacy.
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed or rule-violating input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule was violated (e.g. a second application to the same posting).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The resource exists but the caller lacks rights over it.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
