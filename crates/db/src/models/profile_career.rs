//! Profile career lines.

use joba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `profile_careers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileCareer {
    pub id: DbId,
    pub user_id: DbId,
    pub year: i32,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
