pub mod applications;
pub mod auth;
pub mod health;
pub mod me;
pub mod notices;
pub mod postings;
pub mod profiles;

use axum::extract::DefaultBodyLimit;
use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Allowance for the non-file parts of a multipart form.
const FORM_FIELD_ALLOWANCE_BYTES: usize = 16 * 1024 * 1024;

/// Body limit for routes that accept file uploads.
pub fn multipart_body_limit(config: &ServerConfig) -> DefaultBodyLimit {
    let max_file = usize::try_from(config.max_file_size_bytes).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max_file.saturating_add(FORM_FIELD_ALLOWANCE_BYTES))
}

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login/{provider}                 consent URL (public)
/// /auth/{provider}/callback              code exchange (public)
/// /auth/signup                           finish onboarding (signup token)
/// /auth/me                               current user
///
/// /postings                              list (public), create (multipart)
/// /postings/{id}                         detail (public)
/// /postings/{id}/questions               list (public), replace (owner)
/// /postings/{id}/applications            list (owner)
///
/// /applications                          submit (multipart)
/// /applications/{id}                     own application
/// /applications/{id}/detail              applicant or owner
/// /applications/{id}/status              decide (owner, PATCH)
/// /applications/{id}/cancel              withdraw (applicant, PATCH)
///
/// /me/applications                       my applications
/// /me/postings                           my postings
///
/// /profiles/{user_id}                    get (public), update (self, multipart)
/// /profiles/{user_id}/timetable          upload (self, multipart)
///
/// /notices                               list (public)
/// /notices/{id}                          get (public)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/postings", postings::router(config))
        .nest("/applications", applications::router(config))
        .nest("/me", me::router())
        .nest("/profiles", profiles::router(config))
        .nest("/notices", notices::router())
}
