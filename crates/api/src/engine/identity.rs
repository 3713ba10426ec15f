//! Social login resolution, signup and token issuance.

use joba_core::error::CoreError;
use joba_core::identity::{Provider, SocialIdentity};
use joba_core::profile::validate_track;
use joba_core::types::DbId;
use joba_db::models::user::{OnboardUser, User};
use joba_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{
    generate_access_token, generate_signup_token, validate_token, JwtConfig, TokenType,
};
use crate::engine::not_found;
use crate::error::{is_unique_violation, AppError, AppResult};
use crate::oauth::{OAuthClient, OAuthError};

/// Map a social identity to a local user, creating one when needed.
///
/// Lookup order: provider id, then exact email (linking the provider when
/// that column is still empty), then insert. Returns `(user, is_new)`.
/// A unique violation from a concurrent insert resolves to the winner's row.
pub async fn resolve_or_create(
    pool: &PgPool,
    identity: &SocialIdentity,
) -> AppResult<(User, bool)> {
    let provider = identity.provider;
    let provider_user_id = identity.provider_user_id.as_str();

    if let Some(user) = UserRepo::find_by_provider(pool, provider, provider_user_id).await? {
        return Ok((user, false));
    }

    if let Some(email) = identity.email.as_deref() {
        if let Some(existing) = UserRepo::find_by_email(pool, email).await? {
            return match UserRepo::link_provider(pool, existing.id, provider, provider_user_id)
                .await
            {
                Ok(Some(linked)) => {
                    tracing::info!(
                        user_id = linked.id,
                        provider = provider.as_str(),
                        "Linked provider to existing user"
                    );
                    Ok((linked, false))
                }
                // The email owner is already linked to a different id at this
                // provider. The stored link wins and the new id is not recorded.
                Ok(None) => {
                    tracing::warn!(
                        user_id = existing.id,
                        provider = provider.as_str(),
                        provider_user_id,
                        "Email matched a user linked to another provider id; keeping existing link"
                    );
                    Ok((existing, false))
                }
                Err(err) if is_unique_violation(&err, "uq_users_") => {
                    refetch_after_race(pool, identity, err).await
                }
                Err(err) => Err(err.into()),
            };
        }
    }

    match UserRepo::create_social(pool, provider, provider_user_id, identity.email.as_deref())
        .await
    {
        Ok(user) => {
            tracing::info!(
                user_id = user.id,
                provider = provider.as_str(),
                "Created user from social login"
            );
            Ok((user, true))
        }
        Err(err) if is_unique_violation(&err, "uq_users_") => {
            refetch_after_race(pool, identity, err).await
        }
        Err(err) => Err(err.into()),
    }
}

async fn refetch_after_race(
    pool: &PgPool,
    identity: &SocialIdentity,
    original: sqlx::Error,
) -> AppResult<(User, bool)> {
    if let Some(user) =
        UserRepo::find_by_provider(pool, identity.provider, &identity.provider_user_id).await?
    {
        return Ok((user, false));
    }
    if let Some(email) = identity.email.as_deref() {
        if let Some(user) = UserRepo::find_by_email(pool, email).await? {
            return Ok((user, false));
        }
    }
    Err(original.into())
}

fn oauth_error(provider: Provider, err: OAuthError) -> AppError {
    match err {
        OAuthError::NotConfigured(_) => AppError::BadRequest(err.to_string()),
        other => {
            tracing::warn!(provider = provider.as_str(), error = %other, "OAuth exchange failed");
            AppError::Core(CoreError::Unauthorized(format!(
                "Could not verify {} login",
                provider.as_str()
            )))
        }
    }
}

fn token_error(err: jsonwebtoken::errors::Error) -> AppError {
    AppError::InternalError(format!("Token generation failed: {err}"))
}

/// Build the provider consent URL with a fresh `state` value.
pub fn login_url(oauth: &dyn OAuthClient, provider: Provider) -> AppResult<String> {
    let state = Uuid::new_v4().to_string();
    oauth
        .authorize_url(provider, &state)
        .map_err(|e| oauth_error(provider, e))
}

/// Result of an OAuth callback.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CallbackOutcome {
    /// The user must finish onboarding with the signup token.
    SignupRequired {
        requires_signup: bool,
        signup_token: String,
        email: Option<String>,
    },
    LoggedIn {
        requires_signup: bool,
        access_token: String,
        user_id: DbId,
    },
}

/// Exchange the authorization code and issue the matching token.
pub async fn complete_login(
    pool: &PgPool,
    oauth: &dyn OAuthClient,
    jwt: &JwtConfig,
    provider: Provider,
    code: &str,
    state: Option<&str>,
) -> AppResult<CallbackOutcome> {
    let raw = oauth
        .fetch_user_info(provider, code, state)
        .await
        .map_err(|e| oauth_error(provider, e))?;
    let identity = provider.extract_identity(&raw)?;

    let (user, is_new) = resolve_or_create(pool, &identity).await?;
    tracing::info!(
        user_id = user.id,
        is_new,
        provider = provider.as_str(),
        "Social login resolved"
    );

    if user.is_onboarded {
        Ok(CallbackOutcome::LoggedIn {
            requires_signup: false,
            access_token: generate_access_token(user.id, jwt).map_err(token_error)?,
            user_id: user.id,
        })
    } else {
        Ok(CallbackOutcome::SignupRequired {
            requires_signup: true,
            signup_token: generate_signup_token(user.id, jwt).map_err(token_error)?,
            email: user.email,
        })
    }
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    pub signup_token: String,
    #[validate(length(min = 1, max = 50))]
    pub nickname: String,
    pub track: String,
    #[validate(length(min = 1, max = 100))]
    pub school: String,
    #[validate(url)]
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub access_token: String,
    pub user: User,
}

/// Finish onboarding for the user named by a signup token.
///
/// An already-onboarded user keeps their profile and just receives a fresh
/// access token.
pub async fn signup(
    pool: &PgPool,
    jwt: &JwtConfig,
    input: SignupRequest,
) -> AppResult<SignupResponse> {
    let claims = validate_token(&input.signup_token, jwt)
        .ok()
        .filter(|c| c.typ == TokenType::Signup)
        .ok_or_else(|| CoreError::Unauthorized("Invalid or expired signup token".into()))?;

    let user = UserRepo::find_by_id(pool, claims.sub)
        .await?
        .ok_or_else(|| not_found("User", claims.sub))?;

    if user.is_onboarded {
        return Ok(SignupResponse {
            access_token: generate_access_token(user.id, jwt).map_err(token_error)?,
            user,
        });
    }

    input
        .validate()
        .map_err(|e| CoreError::Validation(e.to_string()))?;
    validate_track(&input.track)?;

    let onboard = OnboardUser {
        nickname: input.nickname.trim().to_string(),
        track: input.track,
        school: input.school.trim().to_string(),
        portfolio_url: input.portfolio_url.filter(|u| !u.trim().is_empty()),
    };
    let user = UserRepo::onboard(pool, user.id, &onboard)
        .await?
        .ok_or_else(|| not_found("User", claims.sub))?;
    tracing::info!(user_id = user.id, track = %onboard.track, "User onboarded");

    Ok(SignupResponse {
        access_token: generate_access_token(user.id, jwt).map_err(token_error)?,
        user,
    })
}

/// The caller's own account summary.
#[derive(Debug, Serialize)]
pub struct Me {
    pub id: DbId,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub track: Option<String>,
    pub is_onboarded: bool,
}

pub async fn me(pool: &PgPool, user_id: DbId) -> AppResult<Me> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| not_found("User", user_id))?;
    Ok(Me {
        id: user.id,
        email: user.email,
        nickname: user.nickname,
        track: user.track,
        is_onboarded: user.is_onboarded,
    })
}
