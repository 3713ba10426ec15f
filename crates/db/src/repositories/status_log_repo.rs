//! Repository for the append-only `application_status_logs` table.

use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::status_log::{ApplicationStatusLog, CreateStatusLog};

const COLUMNS: &str = "id, application_id, previous_status, new_status, changed_by, \
    change_reason, created_at";

/// Appends and reads audit rows. There is no update or delete.
pub struct StatusLogRepo;

impl StatusLogRepo {
    pub async fn append(
        pool: &PgPool,
        input: &CreateStatusLog<'_>,
    ) -> Result<ApplicationStatusLog, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let log = Self::append_inner(&mut tx, input).await?;
        tx.commit().await?;
        Ok(log)
    }

    /// Append a log row within an existing transaction.
    pub async fn append_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateStatusLog<'_>,
    ) -> Result<ApplicationStatusLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO application_status_logs
                (application_id, previous_status, new_status, changed_by, change_reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ApplicationStatusLog>(&query)
            .bind(input.application_id)
            .bind(input.previous_status)
            .bind(input.new_status)
            .bind(input.changed_by)
            .bind(input.change_reason)
            .fetch_one(&mut **tx)
            .await
    }

    /// Every log row of an application, oldest first.
    pub async fn list_for_application(
        pool: &PgPool,
        application_id: DbId,
    ) -> Result<Vec<ApplicationStatusLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM application_status_logs \
             WHERE application_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, ApplicationStatusLog>(&query)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }
}
