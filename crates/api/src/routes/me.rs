use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// My-page routes mounted at `/me`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/applications", get(me::my_applications))
        .route("/postings", get(me::my_postings))
}
