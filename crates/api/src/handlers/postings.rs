//! Handlers for postings.
//!
//! Listing and detail are public; creating a posting requires an access
//! token.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use joba_core::error::CoreError;
use joba_core::posting::{parse_deadline, PostingSort, RecruitmentField, RecruitmentHeadcount};
use joba_core::types::DbId;
use joba_db::models::posting::{CreatePosting, Posting, PostingListFilter};
use serde::Deserialize;

use crate::engine::postings;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::multipart::MultipartForm;
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the posting image.
const IMAGE_FIELD: &str = "image_file";

fn parse_bool(name: &str, raw: &str) -> Result<bool, CoreError> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "Invalid boolean '{other}' for '{name}'"
        ))),
    }
}

fn posting_from_form(form: &MultipartForm) -> AppResult<CreatePosting> {
    Ok(CreatePosting {
        title: form.require_text("title")?,
        description: form.require_text("description")?,
        recruitment_field: RecruitmentField::from_name(&form.require_text("recruitment_field")?)?,
        recruitment_headcount: RecruitmentHeadcount::from_name(
            &form.require_text("recruitment_headcount")?,
        )?,
        school_specific: form
            .text("school_specific")
            .map(|raw| parse_bool("school_specific", &raw))
            .transpose()?
            .unwrap_or(false),
        target_school_name: form.text("target_school_name"),
        deadline: parse_deadline(&form.require_text("deadline")?)?,
        external_link: form.text("external_link"),
    })
}

/// POST /api/v1/postings
///
/// Multipart form: posting fields plus an `image_file` part.
pub async fn create_posting(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Posting>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let input = posting_from_form(&form)?;
    let image = form
        .take_file(IMAGE_FIELD)
        .ok_or_else(|| AppError::BadRequest(format!("Missing required '{IMAGE_FIELD}' file")))?;

    let posting = postings::create_posting(state.engine(), auth.user_id, input, image).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: posting })))
}

#[derive(Debug, Default, Deserialize)]
pub struct PostingListParams {
    pub recruitment_field: Option<String>,
    pub recruitment_headcount: Option<String>,
    pub school_name: Option<String>,
    pub deadline_before: Option<String>,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
    pub size: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl PostingListParams {
    fn into_filter(self) -> Result<(PostingListFilter, Option<i64>, Option<i64>), CoreError> {
        let filter = PostingListFilter {
            recruitment_field: non_blank(self.recruitment_field)
                .map(|v| RecruitmentField::from_name(&v))
                .transpose()?,
            recruitment_headcount: non_blank(self.recruitment_headcount)
                .map(|v| RecruitmentHeadcount::from_name(&v))
                .transpose()?,
            school_name: non_blank(self.school_name),
            deadline_before: non_blank(self.deadline_before)
                .map(|v| parse_deadline(&v))
                .transpose()?,
            q: non_blank(self.q),
            sort: non_blank(self.sort)
                .map(|v| PostingSort::from_name(&v))
                .transpose()?
                .unwrap_or_default(),
        };
        Ok((filter, self.page, self.size))
    }
}

/// GET /api/v1/postings
pub async fn list_postings(
    State(state): State<AppState>,
    Query(params): Query<PostingListParams>,
) -> AppResult<impl IntoResponse> {
    let (filter, page, size) = params.into_filter()?;
    let page = postings::list_postings(&state.pool, &filter, page, size).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/postings/{id}
pub async fn get_posting(
    State(state): State<AppState>,
    Path(posting_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let posting = postings::get_posting(&state.pool, posting_id).await?;
    Ok(Json(DataResponse { data: posting }))
}
