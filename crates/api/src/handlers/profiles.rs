//! Handlers for user profiles.

use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;
use axum::Json;
use joba_core::types::DbId;

use crate::engine::profiles::{self, ProfileUpdate};
use crate::engine::UploadedFile;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::multipart::MultipartForm;
use crate::response::DataResponse;
use crate::state::AppState;

/// Browsers send an empty file part when no file was chosen.
fn chosen(file: Option<UploadedFile>) -> Option<UploadedFile> {
    file.filter(|f| !f.bytes.is_empty() || !f.filename.is_empty())
}

/// GET /api/v1/profiles/{user_id}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = profiles::get_profile(&state.pool, user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profiles/{user_id}
///
/// Multipart form: optional `nickname`, `track`, `school`, `portfolio_url`,
/// `careers` (JSON) and `avatar`/`cover` files.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let update = ProfileUpdate {
        nickname: form.text("nickname"),
        track: form.text("track"),
        school: form.text("school"),
        portfolio_url: form.text("portfolio_url"),
        careers_json: form.text("careers"),
        avatar: chosen(form.take_file("avatar")),
        cover: chosen(form.take_file("cover")),
    };

    let profile = profiles::update_profile(state.engine(), user_id, auth.user_id, update).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// POST /api/v1/profiles/{user_id}/timetable
pub async fn upload_timetable(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = chosen(form.take_file("timetable"))
        .ok_or_else(|| AppError::BadRequest("Missing required 'timetable' file".into()))?;

    let uploaded = profiles::upload_timetable(state.engine(), user_id, auth.user_id, file).await?;
    Ok(Json(DataResponse { data: uploaded }))
}
