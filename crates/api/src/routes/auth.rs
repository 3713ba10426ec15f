use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes mounted at `/auth`.
///
/// ```text
/// GET    /login/{provider}        -> login
/// GET    /{provider}/callback     -> callback
/// POST   /signup                  -> signup
/// GET    /me                      -> me
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/{provider}", get(auth::login))
        .route("/{provider}/callback", get(auth::callback))
        .route("/signup", post(auth::signup))
        .route("/me", get(auth::me))
}
