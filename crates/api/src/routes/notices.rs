use axum::routing::get;
use axum::Router;

use crate::handlers::notices;
use crate::state::AppState;

/// Notice routes mounted at `/notices`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notices::list_notices))
        .route("/{id}", get(notices::get_notice))
}
