#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use joba_api::auth::jwt::{generate_access_token, generate_signup_token, JwtConfig};
use joba_api::config::ServerConfig;
use joba_api::oauth::{OAuthClient, OAuthError, OAuthProviders};
use joba_api::router::build_app_router;
use joba_api::state::AppState;
use joba_core::identity::Provider;
use joba_core::posting::{RecruitmentField, RecruitmentHeadcount};
use joba_core::question::QuestionType;
use joba_core::types::DbId;
use joba_db::models::posting::{CreatePosting, Posting};
use joba_db::models::question::{CreatePostingQuestion, PostingQuestion};
use joba_db::models::user::{OnboardUser, User};
use joba_db::repositories::{PostingQuestionRepo, PostingRepo, UserRepo};
use joba_storage::{MemoryStorage, StorageConfig};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

/// Upload limit used by every test app; small enough to exceed in a test.
pub const TEST_MAX_FILE_SIZE: u64 = 1024;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_file_size_bytes: TEST_MAX_FILE_SIZE,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
            signup_token_expiry_mins: 15,
        },
        storage: StorageConfig {
            bucket: "joba-test".to_string(),
            region: "auto".to_string(),
            endpoint: None,
            public_base_url: None,
        },
        oauth: OAuthProviders::default(),
    }
}

// ---------------------------------------------------------------------------
// OAuth stub
// ---------------------------------------------------------------------------

/// Returns a fixed user-info payload for any code. Google is left
/// unconfigured.
pub struct StubOAuthClient {
    pub payload: Option<serde_json::Value>,
}

#[async_trait]
impl OAuthClient for StubOAuthClient {
    fn authorize_url(&self, provider: Provider, state: &str) -> Result<String, OAuthError> {
        if provider == Provider::Google {
            return Err(OAuthError::NotConfigured(provider.as_str()));
        }
        Ok(format!(
            "https://auth.test/{}/authorize?state={state}",
            provider.as_str()
        ))
    }

    async fn fetch_user_info(
        &self,
        provider: Provider,
        code: &str,
        _state: Option<&str>,
    ) -> Result<serde_json::Value, OAuthError> {
        if provider == Provider::Google {
            return Err(OAuthError::NotConfigured(provider.as_str()));
        }
        match (&self.payload, code) {
            (Some(payload), "good-code") => Ok(payload.clone()),
            _ => Err(OAuthError::Provider {
                provider: provider.as_str(),
                status: 401,
                body: "invalid_grant".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// A router plus handles on the injected collaborators.
pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryStorage>,
}

pub fn build_test_app_with(
    pool: PgPool,
    storage: Arc<MemoryStorage>,
    oauth_payload: Option<serde_json::Value>,
) -> TestApp {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: storage.clone(),
        oauth: Arc::new(StubOAuthClient {
            payload: oauth_payload,
        }),
    };
    TestApp {
        router: build_app_router(state, &config),
        storage,
    }
}

/// Full application router over `pool` with in-memory storage.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, Arc::new(MemoryStorage::new()), None)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn patch_json_auth(
    app: &Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PATCH, uri, Some(token), body).await
}

const BOUNDARY: &str = "joba-test-boundary";

/// Hand-assembled `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, data: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(data);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

pub async fn send_multipart(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    body: MultipartBody,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.finish()))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn access_token(user_id: DbId) -> String {
    generate_access_token(user_id, &test_config().jwt).unwrap()
}

pub fn signup_token(user_id: DbId) -> String {
    generate_signup_token(user_id, &test_config().jwt).unwrap()
}

/// A user who has not onboarded yet.
pub async fn create_pending_user(pool: &PgPool, email: Option<&str>) -> User {
    UserRepo::create_social(pool, Provider::Kakao, &Uuid::new_v4().to_string(), email)
        .await
        .expect("user creation should succeed")
}

/// An onboarded user and an access token for them.
pub async fn create_user(pool: &PgPool, nickname: &str) -> (User, String) {
    let pending = create_pending_user(pool, None).await;
    let user = UserRepo::onboard(
        pool,
        pending.id,
        &OnboardUser {
            nickname: nickname.to_string(),
            track: "backend".to_string(),
            school: "Test University".to_string(),
            portfolio_url: None,
        },
    )
    .await
    .expect("onboarding should succeed")
    .expect("user should exist");
    let token = access_token(user.id);
    (user, token)
}

pub async fn create_posting(pool: &PgPool, owner_id: DbId, title: &str) -> Posting {
    let input = CreatePosting {
        title: title.to_string(),
        description: format!("{title} description"),
        recruitment_field: RecruitmentField::Backend,
        recruitment_headcount: RecruitmentHeadcount::ThreeToFive,
        school_specific: false,
        target_school_name: None,
        deadline: Utc::now() + Duration::days(14),
        external_link: None,
    };
    PostingRepo::create(pool, owner_id, "https://cdn.test/posting.png", &input)
        .await
        .expect("posting creation should succeed")
}

pub fn question(
    question_type: QuestionType,
    content: &str,
    is_required: bool,
) -> CreatePostingQuestion {
    CreatePostingQuestion {
        question_type,
        question_content: content.to_string(),
        is_required,
        choices: None,
    }
}

pub async fn set_questions(
    pool: &PgPool,
    posting_id: DbId,
    questions: &[CreatePostingQuestion],
) -> Vec<PostingQuestion> {
    PostingQuestionRepo::replace_all(pool, posting_id, questions)
        .await
        .expect("question replace should succeed")
}

/// The `application_data` JSON part for a submission.
pub fn application_data(posting_id: DbId, answers: &[(DbId, &str)]) -> String {
    let answers: Vec<_> = answers
        .iter()
        .map(|(id, content)| {
            serde_json::json!({ "posting_question_id": id, "answer_content": content })
        })
        .collect();
    serde_json::json!({ "posting_id": posting_id, "answers": answers }).to_string()
}
