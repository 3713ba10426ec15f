//! My-page handlers: the caller's applications and postings.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::engine::{applications, postings};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me/applications
pub async fn my_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let page =
        applications::list_mine(&state.pool, auth.user_id, params.page, params.size).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/me/postings
pub async fn my_postings(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let postings = postings::list_owned(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: postings }))
}
