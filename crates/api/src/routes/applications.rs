use axum::routing::{get, patch, post};
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::applications;
use crate::routes::multipart_body_limit;
use crate::state::AppState;

/// Application routes mounted at `/applications`.
///
/// ```text
/// POST   /                 -> submit_application (multipart)
/// GET    /{id}             -> get_application
/// GET    /{id}/detail      -> get_application_detail
/// PATCH  /{id}/status      -> update_status
/// PATCH  /{id}/cancel      -> cancel_application
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(applications::submit_application).layer(multipart_body_limit(config)),
        )
        .route("/{id}", get(applications::get_application))
        .route("/{id}/detail", get(applications::get_application_detail))
        .route("/{id}/status", patch(applications::update_status))
        .route("/{id}/cancel", patch(applications::cancel_application))
}
