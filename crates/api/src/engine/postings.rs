//! Posting creation and the public posting views.

use chrono::Utc;
use joba_core::error::CoreError;
use joba_core::pagination::{clamp_page, clamp_size, offset_for, Page};
use joba_core::posting::{
    recruitment_status, validate_image_content_type, RecruitmentStatus,
    DEFAULT_POSTING_PAGE_SIZE,
};
use joba_core::types::{DbId, Timestamp};
use joba_core::upload::UploadKind;
use joba_db::models::posting::{CreatePosting, Posting, PostingListFilter, PostingSummary};
use joba_db::repositories::PostingRepo;
use serde::Serialize;
use sqlx::PgPool;
use validator::Validate;

use crate::engine::{not_found, EngineContext, UploadedFile};
use crate::error::AppResult;

/// A posting with its counters and whether it is still open.
#[derive(Debug, Serialize)]
pub struct PostingView {
    #[serde(flatten)]
    pub summary: PostingSummary,
    pub recruitment_status: RecruitmentStatus,
}

impl PostingView {
    fn at(summary: PostingSummary, now: Timestamp) -> Self {
        let recruitment_status = recruitment_status(summary.posting.deadline, now);
        Self {
            summary,
            recruitment_status,
        }
    }
}

fn views(rows: Vec<PostingSummary>) -> Vec<PostingView> {
    let now = Utc::now();
    rows.into_iter().map(|row| PostingView::at(row, now)).collect()
}

/// Create a posting with its cover image.
pub async fn create_posting(
    ctx: EngineContext<'_>,
    owner_id: DbId,
    input: CreatePosting,
    image: UploadedFile,
) -> AppResult<Posting> {
    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    if input.school_specific
        && input
            .target_school_name
            .as_deref()
            .is_none_or(|name| name.trim().is_empty())
    {
        return Err(CoreError::Validation(
            "School-specific postings must name a target school".into(),
        )
        .into());
    }
    validate_image_content_type(image.content_type.as_deref())?;
    ctx.check_size(&image)?;

    let image_url = ctx.upload(UploadKind::PostingImage, image).await?;
    let posting = PostingRepo::create(ctx.pool, owner_id, &image_url, &input).await?;
    tracing::info!(posting_id = posting.id, owner_id, "Posting created");
    Ok(posting)
}

/// Public, filtered posting list.
pub async fn list_postings(
    pool: &PgPool,
    filter: &PostingListFilter,
    page: Option<i64>,
    size: Option<i64>,
) -> AppResult<Page<PostingView>> {
    let page = clamp_page(page);
    let size = clamp_size(size, DEFAULT_POSTING_PAGE_SIZE);
    let (rows, total_count) = PostingRepo::list(pool, filter, size, offset_for(page, size)).await?;
    Ok(Page {
        total_count,
        page,
        size,
        items: views(rows),
    })
}

/// Public posting detail. Each call counts as one view.
pub async fn get_posting(pool: &PgPool, posting_id: DbId) -> AppResult<PostingView> {
    if !PostingRepo::increment_views(pool, posting_id).await? {
        return Err(not_found("Posting", posting_id).into());
    }
    let summary = PostingRepo::find_summary(pool, posting_id)
        .await?
        .ok_or_else(|| not_found("Posting", posting_id))?;
    Ok(PostingView::at(summary, Utc::now()))
}

/// Postings created by `owner_id`, newest first.
pub async fn list_owned(pool: &PgPool, owner_id: DbId) -> AppResult<Vec<PostingView>> {
    let rows = PostingRepo::list_by_owner(pool, owner_id).await?;
    Ok(views(rows))
}
