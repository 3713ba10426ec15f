//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use joba_core::error::CoreError;
use joba_core::types::DbId;

use crate::auth::jwt::{validate_token, TokenType};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a Bearer access token in the
/// `Authorization` header.
///
/// Signup tokens are rejected: only onboarded users hold access tokens.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if claims.typ != TokenType::Access {
            return Err(AppError::Core(CoreError::Unauthorized(
                "An access token is required".into(),
            )));
        }

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
