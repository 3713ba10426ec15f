//! Operator notices.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use joba_core::types::DbId;
use sqlx::PgPool;

async fn seed_notice(pool: &PgPool, title: &str, content: &str) -> DbId {
    sqlx::query_scalar("INSERT INTO notices (title, content) VALUES ($1, $2) RETURNING id")
        .bind(title)
        .bind(content)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_is_newest_first_without_content(pool: PgPool) {
    seed_notice(&pool, "Welcome", "Hello everyone").await;
    seed_notice(&pool, "Maintenance", "Down on Sunday").await;
    let app = common::build_test_app(pool);

    let response = get(&app.router, "/api/v1/notices").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Maintenance");
    assert!(items[0].get("content").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_includes_content(pool: PgPool) {
    let id = seed_notice(&pool, "Rules", "Be kind").await;
    let app = common::build_test_app(pool);

    let json = body_json(get(&app.router, &format!("/api/v1/notices/{id}")).await).await;
    assert_eq!(json["data"]["title"], "Rules");
    assert_eq!(json["data"]["content"], "Be kind");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_notice_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(&app.router, "/api/v1/notices/31337").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
