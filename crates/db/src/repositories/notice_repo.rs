//! Repository for the `notices` table.

use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::notice::{Notice, NoticeSummary};

pub struct NoticeRepo;

impl NoticeRepo {
    /// All notices, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<NoticeSummary>, sqlx::Error> {
        sqlx::query_as::<_, NoticeSummary>(
            "SELECT id, title, created_at FROM notices ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Notice>, sqlx::Error> {
        sqlx::query_as::<_, Notice>(
            "SELECT id, title, content, created_at, updated_at FROM notices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
