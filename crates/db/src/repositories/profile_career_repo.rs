//! Repository for the `profile_careers` table.

use joba_core::profile::CareerEntry;
use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile_career::ProfileCareer;

const COLUMNS: &str = "id, user_id, year, description, created_at, updated_at";

/// Career lines are only ever written as a whole set per user.
pub struct ProfileCareerRepo;

impl ProfileCareerRepo {
    /// A user's careers, newest year first, then by id.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProfileCareer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profile_careers WHERE user_id = $1 ORDER BY year DESC, id"
        );
        sqlx::query_as::<_, ProfileCareer>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every career of a user. An empty slice clears them.
    pub async fn replace_all(
        pool: &PgPool,
        user_id: DbId,
        careers: &[CareerEntry],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::replace_all_inner(&mut tx, user_id, careers).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Replace careers within an existing transaction.
    pub async fn replace_all_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        user_id: DbId,
        careers: &[CareerEntry],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM profile_careers WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        for career in careers {
            sqlx::query(
                "INSERT INTO profile_careers (user_id, year, description) VALUES ($1, $2, $3)",
            )
            .bind(user_id)
            .bind(career.year)
            .bind(&career.description)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
