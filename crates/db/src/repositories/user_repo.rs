//! Repository for the `users` table.

use joba_core::identity::Provider;
use joba_core::profile::CareerEntry;
use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{OnboardUser, UpdateUserProfile, User};
use crate::repositories::ProfileCareerRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, kakao_id, naver_id, google_id, nickname, track, school, \
    portfolio_url, avatar_url, cover_url, timetable_url, is_onboarded, created_at, updated_at";

/// Provides lookups and profile writes for users.
pub struct UserRepo;

impl UserRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the user linked to `provider_user_id` at `provider`.
    pub async fn find_by_provider(
        pool: &PgPool,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE {} = $1",
            provider.id_column()
        );
        sqlx::query_as::<_, User>(&query)
            .bind(provider_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by exact email.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Link a provider id to an existing user.
    ///
    /// Only fills an empty provider column; returns `None` when the user is
    /// missing or already linked to a different account at that provider.
    pub async fn link_provider(
        pool: &PgPool,
        user_id: DbId,
        provider: Provider,
        provider_user_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let column = provider.id_column();
        let query = format!(
            "UPDATE users SET {column} = $2
             WHERE id = $1 AND {column} IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .bind(provider_user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new, not yet onboarded user for a social identity.
    pub async fn create_social(
        pool: &PgPool,
        provider: Provider,
        provider_user_id: &str,
        email: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users ({}, email, is_onboarded)
             VALUES ($1, $2, false)
             RETURNING {COLUMNS}",
            provider.id_column()
        );
        sqlx::query_as::<_, User>(&query)
            .bind(provider_user_id)
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Store signup fields and mark the user onboarded.
    pub async fn onboard(
        pool: &PgPool,
        id: DbId,
        input: &OnboardUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                nickname = $2,
                track = $3,
                school = $4,
                portfolio_url = $5,
                is_onboarded = true
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.nickname)
            .bind(&input.track)
            .bind(&input.school)
            .bind(&input.portfolio_url)
            .fetch_optional(pool)
            .await
    }

    /// Apply a profile patch and, when `careers` is given, replace the
    /// user's careers in the same transaction.
    ///
    /// Returns `None` if the user does not exist; nothing is written then.
    pub async fn update_profile(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUserProfile,
        careers: Option<&[CareerEntry]>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE users SET
                nickname = COALESCE($2, nickname),
                track = COALESCE($3, track),
                school = COALESCE($4, school),
                portfolio_url = COALESCE($5, portfolio_url),
                avatar_url = COALESCE($6, avatar_url),
                cover_url = COALESCE($7, cover_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.nickname)
            .bind(&input.track)
            .bind(&input.school)
            .bind(&input.portfolio_url)
            .bind(&input.avatar_url)
            .bind(&input.cover_url)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user) = user else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(careers) = careers {
            ProfileCareerRepo::replace_all_inner(&mut tx, id, careers).await?;
        }

        tx.commit().await?;
        Ok(Some(user))
    }

    pub async fn set_timetable(
        pool: &PgPool,
        id: DbId,
        timetable_url: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET timetable_url = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(timetable_url)
            .fetch_optional(pool)
            .await
    }
}
