use joba_core::types::DbId;
use joba_db::models::notice::{Notice, NoticeSummary};
use joba_db::repositories::NoticeRepo;
use sqlx::PgPool;

use crate::engine::not_found;
use crate::error::AppResult;

pub async fn list_notices(pool: &PgPool) -> AppResult<Vec<NoticeSummary>> {
    Ok(NoticeRepo::list(pool).await?)
}

pub async fn get_notice(pool: &PgPool, id: DbId) -> AppResult<Notice> {
    NoticeRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Notice", id).into())
}
