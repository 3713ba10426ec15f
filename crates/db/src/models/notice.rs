//! Operator-authored notices.

use joba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notice {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// List projection without the body.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NoticeSummary {
    pub id: DbId,
    pub title: String,
    pub created_at: Timestamp,
}
