//! JWT generation and validation.
//!
//! Two kinds of HS256 token share one [`Claims`] shape and are told apart
//! by `typ`. An `access` token authenticates API calls. A short-lived
//! `signup` token is issued to a social-login user who has not finished
//! onboarding and is only accepted by the signup endpoint.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use joba_core::types::DbId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Signup,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub typ: TokenType,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in minutes (default: 7 days).
    pub access_token_expiry_mins: i64,
    /// Signup token lifetime in minutes (default: 15).
    pub signup_token_expiry_mins: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 7 * 24 * 60;
const DEFAULT_SIGNUP_EXPIRY_MINS: i64 = 15;

impl JwtConfig {
    /// Load JWT configuration through `lookup`.
    ///
    /// | Env Var                    | Required | Default  |
    /// |----------------------------|----------|----------|
    /// | `JWT_SECRET`               | **yes**  | --       |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `10080`  |
    /// | `JWT_SIGNUP_EXPIRY_MINS`   | no       | `15`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let secret = lookup("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins: i64 = lookup("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);

        let signup_token_expiry_mins: i64 = lookup("JWT_SIGNUP_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_SIGNUP_EXPIRY_MINS must be a valid i64"))
            .unwrap_or(DEFAULT_SIGNUP_EXPIRY_MINS);

        Self {
            secret,
            access_token_expiry_mins,
            signup_token_expiry_mins,
        }
    }
}

fn generate_token(
    user_id: DbId,
    typ: TokenType,
    expiry_mins: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        typ,
        exp: now + expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Generate an access token for an onboarded user.
pub fn generate_access_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(
        user_id,
        TokenType::Access,
        config.access_token_expiry_mins,
        config,
    )
}

/// Generate a signup token for a user who still has to onboard.
pub fn generate_signup_token(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    generate_token(
        user_id,
        TokenType::Signup,
        config.signup_token_expiry_mins,
        config,
    )
}

/// Validate signature and expiry, returning the embedded [`Claims`].
///
/// The caller checks `typ`.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}
