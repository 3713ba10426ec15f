//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page-number pagination (`?page=&size=`). Clamped in the engine via
/// `joba_core::pagination`.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}
