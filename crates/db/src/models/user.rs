//! User entity model and DTOs.

use joba_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub kakao_id: Option<String>,
    #[serde(skip_serializing)]
    pub naver_id: Option<String>,
    #[serde(skip_serializing)]
    pub google_id: Option<String>,
    pub nickname: Option<String>,
    pub track: Option<String>,
    pub school: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub timetable_url: Option<String>,
    pub is_onboarded: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields set once when a social-login user finishes signup.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardUser {
    pub nickname: String,
    pub track: String,
    pub school: String,
    pub portfolio_url: Option<String>,
}

/// Profile patch. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserProfile {
    pub nickname: Option<String>,
    pub track: Option<String>,
    pub school: Option<String>,
    pub portfolio_url: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
}
