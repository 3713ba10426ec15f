//! Posting entity model, DTOs and list projections.

use joba_core::posting::{PostingSort, RecruitmentField, RecruitmentHeadcount};
use joba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `postings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Posting {
    pub id: DbId,
    pub owner_id: DbId,
    pub image_url: String,
    pub title: String,
    pub description: String,
    pub recruitment_field: String,
    pub recruitment_headcount: String,
    pub school_specific: bool,
    pub target_school_name: Option<String>,
    pub deadline: Timestamp,
    pub external_link: Option<String>,
    pub views: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A posting enriched with its application counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostingSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub posting: Posting,
    pub application_count: i64,
    /// Number of accepted applications.
    pub recruited_count: i64,
}

/// DTO for creating a posting. The image URL is supplied separately once
/// the image has been uploaded.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePosting {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub recruitment_field: RecruitmentField,
    pub recruitment_headcount: RecruitmentHeadcount,
    #[serde(default)]
    pub school_specific: bool,
    #[validate(length(max = 100))]
    pub target_school_name: Option<String>,
    pub deadline: Timestamp,
    #[validate(length(max = 255))]
    pub external_link: Option<String>,
}

/// Filters for the public posting list.
#[derive(Debug, Clone, Default)]
pub struct PostingListFilter {
    pub recruitment_field: Option<RecruitmentField>,
    pub recruitment_headcount: Option<RecruitmentHeadcount>,
    /// Matches the target school exactly, or a title/description substring.
    pub school_name: Option<String>,
    pub deadline_before: Option<Timestamp>,
    /// Free-text search over title and description.
    pub q: Option<String>,
    pub sort: PostingSort,
}
