use axum::routing::{get, post};
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::profiles;
use crate::routes::multipart_body_limit;
use crate::state::AppState;

/// Profile routes mounted at `/profiles`.
///
/// ```text
/// GET    /{user_id}             -> get_profile
/// PUT    /{user_id}             -> update_profile (multipart)
/// POST   /{user_id}/timetable   -> upload_timetable (multipart)
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/{user_id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .layer(multipart_body_limit(config)),
        )
        .route(
            "/{user_id}/timetable",
            post(profiles::upload_timetable).layer(multipart_body_limit(config)),
        )
}
