//! Handlers for a posting's question set.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use joba_core::types::DbId;
use joba_db::models::question::{CreatePostingQuestion, PostingQuestion};
use serde::{Deserialize, Serialize};

use crate::engine::questions;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReplaceQuestionsRequest {
    pub questions: Vec<CreatePostingQuestion>,
}

#[derive(Debug, Serialize)]
pub struct ReplacedQuestions {
    pub count: usize,
    pub questions: Vec<PostingQuestion>,
}

/// POST /api/v1/postings/{id}/questions
///
/// Replace the whole question set. Owner only.
pub async fn replace_questions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(posting_id): Path<DbId>,
    Json(input): Json<ReplaceQuestionsRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ReplacedQuestions>>)> {
    let stored =
        questions::replace_questions(&state.pool, posting_id, auth.user_id, &input.questions)
            .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ReplacedQuestions {
                count: stored.len(),
                questions: stored,
            },
        }),
    ))
}

/// GET /api/v1/postings/{id}/questions
pub async fn list_questions(
    State(state): State<AppState>,
    Path(posting_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let questions = questions::list_questions(&state.pool, posting_id).await?;
    Ok(Json(DataResponse { data: questions }))
}
