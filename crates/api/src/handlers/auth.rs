//! Handlers for social login and onboarding.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use joba_core::identity::Provider;
use serde::{Deserialize, Serialize};

use crate::engine::identity::{self, SignupRequest};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginUrl {
    pub url: String,
}

/// GET /api/v1/auth/login/{provider}
///
/// Returns the provider's consent URL for the frontend to redirect to.
pub async fn login(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> AppResult<impl IntoResponse> {
    let provider = Provider::from_name(&provider)?;
    let url = identity::login_url(state.oauth.as_ref(), provider)?;

    Ok(Json(DataResponse {
        data: LoginUrl { url },
    }))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// GET /api/v1/auth/{provider}/callback
///
/// Completes the authorization-code exchange. Users who have not onboarded
/// yet receive a short-lived signup token instead of an access token.
pub async fn callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
) -> AppResult<impl IntoResponse> {
    let provider = Provider::from_name(&provider)?;

    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!(
            "{} login was not completed: {error}",
            provider.as_str()
        )));
    }
    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing 'code' parameter".into()))?;

    let outcome = identity::complete_login(
        &state.pool,
        state.oauth.as_ref(),
        &state.config.jwt,
        provider,
        &code,
        params.state.as_deref(),
    )
    .await?;

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let result = identity::signup(&state.pool, &state.config.jwt, input).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/auth/me
pub async fn me(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let me = identity::me(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: me }))
}
