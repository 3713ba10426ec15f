//! Application submission, review, decisions and cancellation.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use common::{
    application_data, body_json, get_auth, patch_json_auth, question, send_multipart,
    MultipartBody,
};
use joba_core::question::QuestionType;
use joba_core::types::DbId;
use joba_db::repositories::StatusLogRepo;
use joba_storage::MemoryStorage;
use serde_json::json;
use sqlx::PgPool;

async fn submit(
    app: &axum::Router,
    token: &str,
    posting_id: DbId,
    answers: &[(DbId, &str)],
    files: &[(&str, &[u8])],
) -> axum::response::Response {
    let mut body =
        MultipartBody::new().text("application_data", &application_data(posting_id, answers));
    for (filename, data) in files {
        body = body.file("files", filename, "application/pdf", data);
    }
    send_multipart(app, Method::POST, "/api/v1/applications", token, body).await
}

async fn application_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM applications")
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn answer_count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM application_answers")
        .fetch_one(pool)
        .await
        .unwrap()
}

fn status_uri(id: DbId) -> String {
    format!("/api/v1/applications/{id}/status")
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn text_application_lifecycle(pool: PgPool) {
    let (owner, owner_token) = common::create_user(&pool, "owner").await;
    let (_, applicant_token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Study group").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::ShortText, "Why join?", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let response = submit(
        &app.router,
        &applicant_token,
        posting.id,
        &[(questions[0].id, "To learn")],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "submitted");
    let application_id = json["data"]["id"].as_i64().unwrap();

    let response =
        submit(&app.router, &applicant_token, posting.id, &[(questions[0].id, "Again")], &[]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = patch_json_auth(
        &app.router,
        &status_uri(application_id),
        &owner_token,
        json!({ "status": "accepted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "accepted");

    let response = patch_json_auth(
        &app.router,
        &status_uri(application_id),
        &owner_token,
        json!({ "status": "rejected" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        &app.router,
        &format!("/api/v1/applications/{application_id}"),
        &applicant_token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["status"], "accepted");

    let logs = StatusLogRepo::list_for_application(&pool, application_id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].previous_status, "submitted");
    assert_eq!(logs[0].new_status, "accepted");
    assert_eq!(logs[0].changed_by, owner.id);
    assert!(logs[0].change_reason.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_required_answers_are_all_named(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Hackathon").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[
            question(QuestionType::ShortText, "Team name", true),
            question(QuestionType::LongText, "Idea", true),
            question(QuestionType::ShortText, "Anything else", false),
        ],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let response = submit(&app.router, &token, posting.id, &[(questions[2].id, "no")], &[]).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("Team name"));
    assert!(message.contains("Idea"));
    assert_eq!(application_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_question_ids_are_listed(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "P1").await;
    let other = common::create_posting(&pool, owner.id, "P2").await;
    let own_q = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::ShortText, "Q", false)],
    )
    .await;
    let other_q = common::set_questions(
        &pool,
        other.id,
        &[question(QuestionType::ShortText, "Other", false)],
    )
    .await;
    let app = common::build_test_app(pool);

    let response = submit(
        &app.router,
        &token,
        posting.id,
        &[(own_q[0].id, "a"), (other_q[0].id, "b")],
        &[],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains(&other_q[0].id.to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn posting_without_questions_rejects_submissions(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Empty").await;
    let app = common::build_test_app(pool);

    let response = submit(&app.router, &token, posting.id, &[], &[]).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_posting_is_not_found(pool: PgPool) {
    let (_, token) = common::create_user(&pool, "applicant").await;
    let app = common::build_test_app(pool);

    let response = submit(&app.router, &token, 424242, &[], &[]).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unresolved_attachment_persists_nothing(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Design team").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::Attachment, "Portfolio", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let response = submit(
        &app.router,
        &token,
        posting.id,
        &[(questions[0].id, "portfolio.pdf")],
        &[("resume.pdf", b"%PDF-1.4".as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("portfolio.pdf"));
    assert_eq!(application_count(&pool).await, 0);
    assert_eq!(answer_count(&pool).await, 0);
    assert!(app.storage.is_empty().await);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attachment_answer_stores_the_uploaded_url(pool: PgPool) {
    let (owner, owner_token) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Data team").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[
            question(QuestionType::Attachment, "CV", true),
            question(QuestionType::ShortText, "Intro", true),
        ],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let response = submit(
        &app.router,
        &token,
        posting.id,
        &[(questions[0].id, "my cv.pdf"), (questions[1].id, "hello")],
        &[("cv.pdf", b"%PDF-cv".as_slice())],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let application_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let keys = app.storage.keys().await;
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("applications/attachments/"));
    assert!(keys[0].ends_with(".pdf"));
    assert_eq!(app.storage.get(&keys[0]).await.unwrap().bytes, b"%PDF-cv");

    let response = get_auth(
        &app.router,
        &format!("/api/v1/applications/{application_id}/detail"),
        &owner_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["questions"][0]["answer_content"], format!("memory://{}", keys[0]));
    assert_eq!(json["data"]["questions"][1]["answer_content"], "hello");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn oversized_file_is_rejected_before_upload(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Big files").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::Attachment, "Reel", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let big = vec![0u8; common::TEST_MAX_FILE_SIZE as usize + 1];
    let response = submit(
        &app.router,
        &token,
        posting.id,
        &[(questions[0].id, "reel.mp4")],
        &[("reel.mp4", big.as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].as_str().unwrap().contains("reel.mp4"));
    assert!(app.storage.is_empty().await);
    assert_eq!(application_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn storage_failure_is_internal_and_persists_nothing(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Flaky").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::Attachment, "CV", true)],
    )
    .await;
    let app = common::build_test_app_with(pool.clone(), Arc::new(MemoryStorage::failing()), None);

    let response = submit(
        &app.router,
        &token,
        posting.id,
        &[(questions[0].id, "cv.pdf")],
        &[("cv.pdf", b"x".as_slice())],
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(application_count(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_duplicate_submissions_yield_one_conflict(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Race").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::ShortText, "Q", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let answers = [(questions[0].id, "a")];
    let (a, b) = tokio::join!(
        submit(&app.router, &token, posting.id, &answers, &[]),
        submit(&app.router, &token, posting.id, &answers, &[])
    );

    let mut statuses = vec![a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(application_count(&pool).await, 1);
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

async fn submitted_application(pool: &PgPool) -> (DbId, String, String, common::TestApp) {
    let (owner, owner_token) = common::create_user(pool, "owner").await;
    let (_, applicant_token) = common::create_user(pool, "applicant").await;
    let posting = common::create_posting(pool, owner.id, "Transitions").await;
    let questions = common::set_questions(
        pool,
        posting.id,
        &[question(QuestionType::ShortText, "Q", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let response =
        submit(&app.router, &applicant_token, posting.id, &[(questions[0].id, "a")], &[]).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    (id, owner_token, applicant_token, app)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_decisions_are_accepted_as_status(pool: PgPool) {
    let (id, owner_token, _, app) = submitted_application(&pool).await;

    for status in ["submitted", "cancelled", "pending"] {
        let response = patch_json_auth(
            &app.router,
            &status_uri(id),
            &owner_token,
            json!({ "status": status }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "status {status}");
    }
    assert!(StatusLogRepo::list_for_application(&pool, id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_owner_decides(pool: PgPool) {
    let (id, _, applicant_token, app) = submitted_application(&pool).await;

    let response = patch_json_auth(
        &app.router,
        &status_uri(id),
        &applicant_token,
        json!({ "status": "accepted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancel_only_from_submitted(pool: PgPool) {
    let (id, owner_token, applicant_token, app) = submitted_application(&pool).await;
    let cancel_uri = format!("/api/v1/applications/{id}/cancel");

    let response = patch_json_auth(&app.router, &cancel_uri, &applicant_token, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "cancelled");

    let response = patch_json_auth(&app.router, &cancel_uri, &applicant_token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = patch_json_auth(
        &app.router,
        &status_uri(id),
        &owner_token,
        json!({ "status": "accepted" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let logs = StatusLogRepo::list_for_application(&pool, id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].new_status, "cancelled");
    assert_eq!(logs[0].change_reason.as_deref(), Some("applicant cancellation"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn decided_application_cannot_be_cancelled(pool: PgPool) {
    let (id, owner_token, applicant_token, app) = submitted_application(&pool).await;

    patch_json_auth(
        &app.router,
        &status_uri(id),
        &owner_token,
        json!({ "status": "rejected" }),
    )
    .await;
    let response = patch_json_auth(
        &app.router,
        &format!("/api/v1/applications/{id}/cancel"),
        &applicant_token,
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn only_the_applicant_cancels(pool: PgPool) {
    let (id, owner_token, _, app) = submitted_application(&pool).await;

    let response = patch_json_auth(
        &app.router,
        &format!("/api/v1/applications/{id}/cancel"),
        &owner_token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reapplying_after_cancel_conflicts(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Second chance").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::ShortText, "Q", true)],
    )
    .await;
    let app = common::build_test_app(pool);

    let response = submit(&app.router, &token, posting.id, &[(questions[0].id, "a")], &[]).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();
    patch_json_auth(
        &app.router,
        &format!("/api/v1/applications/{id}/cancel"),
        &token,
        json!({}),
    )
    .await;

    let response = submit(&app.router, &token, posting.id, &[(questions[0].id, "b")], &[]).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn own_application_is_hidden_from_others(pool: PgPool) {
    let (id, owner_token, applicant_token, app) = submitted_application(&pool).await;
    let uri = format!("/api/v1/applications/{id}");

    assert_eq!(get_auth(&app.router, &uri, &applicant_token).await.status(), StatusCode::OK);
    assert_eq!(get_auth(&app.router, &uri, &owner_token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_detail_views_are_audited(pool: PgPool) {
    let (id, owner_token, applicant_token, app) = submitted_application(&pool).await;
    let (_, stranger) = common::create_user(&pool, "stranger").await;
    let uri = format!("/api/v1/applications/{id}/detail");

    let response = get_auth(&app.router, &uri, &applicant_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(StatusLogRepo::list_for_application(&pool, id).await.unwrap().is_empty());

    let response = get_auth(&app.router, &uri, &owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["posting_title"], "Transitions");
    assert_eq!(json["data"]["questions"][0]["answer_content"], "a");

    let logs = StatusLogRepo::list_for_application(&pool, id).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].previous_status, "submitted");
    assert_eq!(logs[0].new_status, "submitted");
    assert_eq!(logs[0].change_reason.as_deref(), Some("detail view"));

    assert_eq!(get_auth(&app.router, &uri, &stranger).await.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unanswered_questions_appear_as_null(pool: PgPool) {
    let (owner, owner_token) = common::create_user(&pool, "owner").await;
    let (_, token) = common::create_user(&pool, "applicant").await;
    let posting = common::create_posting(&pool, owner.id, "Optional").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[
            question(QuestionType::ShortText, "Required", true),
            question(QuestionType::ShortText, "Optional", false),
        ],
    )
    .await;
    let app = common::build_test_app(pool);

    let response = submit(&app.router, &token, posting.id, &[(questions[0].id, "yes")], &[]).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let json = body_json(
        get_auth(&app.router, &format!("/api/v1/applications/{id}/detail"), &owner_token).await,
    )
    .await;
    let listed = json["data"]["questions"].as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1]["question_content"], "Optional");
    assert!(listed[1]["answer_content"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_lists_applications_with_filters(pool: PgPool) {
    let (owner, owner_token) = common::create_user(&pool, "owner").await;
    let posting = common::create_posting(&pool, owner.id, "Popular").await;
    let questions = common::set_questions(
        &pool,
        posting.id,
        &[question(QuestionType::ShortText, "Q", true)],
    )
    .await;
    let app = common::build_test_app(pool.clone());

    let mut ids = Vec::new();
    for name in ["ann", "ben", "cat"] {
        let (_, token) = common::create_user(&pool, name).await;
        let response =
            submit(&app.router, &token, posting.id, &[(questions[0].id, name)], &[]).await;
        ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }
    let unnamed = common::create_pending_user(&pool, None).await;
    let response = submit(
        &app.router,
        &common::access_token(unnamed.id),
        posting.id,
        &[(questions[0].id, "?")],
        &[],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    patch_json_auth(
        &app.router,
        &status_uri(ids[0]),
        &owner_token,
        json!({ "status": "accepted" }),
    )
    .await;

    let base = format!("/api/v1/postings/{}/applications", posting.id);
    let json = body_json(get_auth(&app.router, &base, &owner_token).await).await;
    assert_eq!(json["data"]["total_count"], 4);
    assert_eq!(json["data"]["page"], 1);
    assert_eq!(json["data"]["size"], 20);
    assert_eq!(json["data"]["items"][0]["applicant_name"], "unknown");

    let json = body_json(
        get_auth(&app.router, &format!("{base}?status=accepted"), &owner_token).await,
    )
    .await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["items"][0]["applicant_name"], "ann");

    let json = body_json(
        get_auth(&app.router, &format!("{base}?sort=oldest&size=2&page=2"), &owner_token).await,
    )
    .await;
    assert_eq!(json["data"]["total_count"], 4);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"]["items"][0]["applicant_name"], "cat");

    let response = get_auth(&app.router, &format!("{base}?sort=loudest"), &owner_token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_owner_cannot_list_applications(pool: PgPool) {
    let (owner, _) = common::create_user(&pool, "owner").await;
    let (_, stranger) = common::create_user(&pool, "stranger").await;
    let posting = common::create_posting(&pool, owner.id, "Private").await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        &app.router,
        &format!("/api/v1/postings/{}/applications", posting.id),
        &stranger,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn my_applications_carry_posting_titles(pool: PgPool) {
    let (_, _, applicant_token, app) = submitted_application(&pool).await;

    let response = get_auth(&app.router, "/api/v1/me/applications", &applicant_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_count"], 1);
    assert_eq!(json["data"]["items"][0]["posting_title"], "Transitions");
    assert_eq!(json["data"]["items"][0]["status"], "submitted");
}
