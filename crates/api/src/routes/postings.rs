use axum::routing::get;
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::{applications, postings, questions};
use crate::routes::multipart_body_limit;
use crate::state::AppState;

/// Posting routes mounted at `/postings`.
///
/// ```text
/// GET    /                       -> list_postings
/// POST   /                       -> create_posting (multipart)
/// GET    /{id}                   -> get_posting
/// GET    /{id}/questions         -> list_questions
/// POST   /{id}/questions         -> replace_questions
/// GET    /{id}/applications      -> list_posting_applications
/// ```
pub fn router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(postings::list_postings)
                .post(postings::create_posting)
                .layer(multipart_body_limit(config)),
        )
        .route("/{id}", get(postings::get_posting))
        .route(
            "/{id}/questions",
            get(questions::list_questions).post(questions::replace_questions),
        )
        .route(
            "/{id}/applications",
            get(applications::list_posting_applications),
        )
}
