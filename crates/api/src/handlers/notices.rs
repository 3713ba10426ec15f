//! Handlers for operator notices. Public.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use joba_core::types::DbId;

use crate::engine::notices;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notices
pub async fn list_notices(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let notices = notices::list_notices(&state.pool).await?;
    Ok(Json(DataResponse { data: notices }))
}

/// GET /api/v1/notices/{id}
pub async fn get_notice(
    State(state): State<AppState>,
    Path(notice_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notice = notices::get_notice(&state.pool, notice_id).await?;
    Ok(Json(DataResponse { data: notice }))
}
