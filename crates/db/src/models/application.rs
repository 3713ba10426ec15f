//! Application, answer and read-side projections.

use joba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub posting_id: DbId,
    pub applicant_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An answer ready to be stored: text as given, or the uploaded file URL.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAnswer {
    pub posting_question_id: DbId,
    pub answer_content: String,
}

/// One row of a recruiter's applicant list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationListItem {
    pub id: DbId,
    pub posting_id: DbId,
    pub applicant_id: DbId,
    /// Applicant nickname, or a placeholder when unset.
    pub applicant_name: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A posting question paired with this application's answer, if any.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnsweredQuestion {
    pub question_id: DbId,
    pub question_type: String,
    pub question_content: String,
    pub is_required: bool,
    pub choices: Option<serde_json::Value>,
    pub answer_id: Option<DbId>,
    pub answer_content: Option<String>,
}

/// One row of the applicant's own history.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MyApplication {
    pub id: DbId,
    pub posting_id: DbId,
    pub posting_title: String,
    pub posting_image_url: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A posting the user was accepted into, shown on their profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RecentProject {
    pub id: DbId,
    pub title: String,
    pub image_url: String,
}
