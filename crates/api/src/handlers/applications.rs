//! Handlers for applications.
//!
//! Submission is a multipart form: an `application_data` JSON part with the
//! posting id and answers, and any number of `files` parts that attachment
//! answers refer to by filename.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use joba_core::application::{ApplicationSort, ApplicationStatus};
use joba_core::types::DbId;
use joba_db::models::application::Application;
use serde::Deserialize;

use crate::engine::applications::{self, ApplicationListQuery, SubmitApplication};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::multipart::MultipartForm;
use crate::response::DataResponse;
use crate::state::AppState;

const DATA_FIELD: &str = "application_data";
const FILES_FIELD: &str = "files";

/// POST /api/v1/applications
pub async fn submit_application(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Application>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let input: SubmitApplication = form.json(DATA_FIELD)?;
    let files = form.take_files(FILES_FIELD);

    let application = applications::submit(state.engine(), auth.user_id, input, files).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: application })))
}

/// GET /api/v1/applications/{id}
///
/// The caller's own application. Other users get 404.
pub async fn get_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = applications::get_own(&state.pool, application_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: application }))
}

/// GET /api/v1/applications/{id}/detail
pub async fn get_application_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = applications::get_detail(&state.pool, application_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: detail }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PATCH /api/v1/applications/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let application =
        applications::update_status(&state.pool, application_id, &input.status, auth.user_id)
            .await?;
    Ok(Json(DataResponse { data: application }))
}

/// PATCH /api/v1/applications/{id}/cancel
pub async fn cancel_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(application_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let application = applications::cancel(&state.pool, application_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: application }))
}

#[derive(Debug, Default, Deserialize)]
pub struct ApplicationListParams {
    pub status: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// GET /api/v1/postings/{id}/applications
///
/// Owner only. `?status=&sort=newest|oldest|status&page=&size=`.
pub async fn list_posting_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(posting_id): Path<DbId>,
    Query(params): Query<ApplicationListParams>,
) -> AppResult<impl IntoResponse> {
    let query = ApplicationListQuery {
        status: params
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(ApplicationStatus::from_name)
            .transpose()?,
        sort: params
            .sort
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(ApplicationSort::from_name)
            .transpose()?
            .unwrap_or_default(),
        page: params.page,
        size: params.size,
    };

    let page =
        applications::list_for_posting(&state.pool, posting_id, auth.user_id, &query).await?;
    Ok(Json(DataResponse { data: page }))
}
