//! Posting question model and DTOs.

use joba_core::question::QuestionType;
use joba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posting_questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostingQuestion {
    pub id: DbId,
    pub posting_id: DbId,
    pub question_type: String,
    pub question_content: String,
    pub is_required: bool,
    /// JSON array of strings; `null` for non-choice questions.
    pub choices: Option<serde_json::Value>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One question in a replacement set.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostingQuestion {
    pub question_type: QuestionType,
    pub question_content: String,
    #[serde(default)]
    pub is_required: bool,
    pub choices: Option<Vec<String>>,
}
