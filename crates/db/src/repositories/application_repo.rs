//! Repository for the `applications` and `application_answers` tables.

use joba_core::application::{ApplicationSort, ApplicationStatus, UNKNOWN_APPLICANT_NAME};
use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{
    AnsweredQuestion, Application, ApplicationListItem, MyApplication, NewAnswer, RecentProject,
};
use crate::models::status_log::CreateStatusLog;
use crate::repositories::StatusLogRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, posting_id, applicant_id, status, created_at, updated_at";

/// Applications are created with their answers and never deleted. Status
/// changes go through [`ApplicationRepo::set_status`], which also appends
/// the audit row.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Whether `applicant_id` already applied to `posting_id`, in any status.
    pub async fn exists_for(
        pool: &PgPool,
        applicant_id: DbId,
        posting_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM applications WHERE applicant_id = $1 AND posting_id = $2
             )",
        )
        .bind(applicant_id)
        .bind(posting_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a `submitted` application and all of its answers atomically.
    ///
    /// A second application for the same pair fails with a unique violation
    /// on `uq_applications_applicant_posting`; nothing is written then.
    pub async fn create_with_answers(
        pool: &PgPool,
        posting_id: DbId,
        applicant_id: DbId,
        answers: &[NewAnswer],
    ) -> Result<Application, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO applications (posting_id, applicant_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(posting_id)
            .bind(applicant_id)
            .bind(ApplicationStatus::Submitted.as_str())
            .fetch_one(&mut *tx)
            .await?;

        for answer in answers {
            sqlx::query(
                "INSERT INTO application_answers
                    (application_id, posting_question_id, answer_content)
                 VALUES ($1, $2, $3)",
            )
            .bind(application.id)
            .bind(answer.posting_question_id)
            .bind(&answer.answer_content)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(application)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lock the application row for the rest of the transaction.
    pub async fn find_by_id_for_update(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Set the status of a locked application and append the matching log row.
    pub async fn set_status(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        current: &Application,
        new_status: ApplicationStatus,
        changed_by: DbId,
        change_reason: Option<&str>,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(current.id)
            .bind(new_status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        StatusLogRepo::append_inner(
            tx,
            &CreateStatusLog {
                application_id: current.id,
                previous_status: &current.status,
                new_status: new_status.as_str(),
                changed_by,
                change_reason,
            },
        )
        .await?;

        Ok(updated)
    }

    /// One page of a posting's applications with applicant display names.
    pub async fn list_for_posting(
        pool: &PgPool,
        posting_id: DbId,
        status: Option<ApplicationStatus>,
        sort: ApplicationSort,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApplicationListItem>, sqlx::Error> {
        let query = format!(
            "SELECT a.id, a.posting_id, a.applicant_id, \
                    COALESCE(u.nickname, $3) AS applicant_name, \
                    a.status, a.created_at, a.updated_at \
             FROM applications a \
             JOIN users u ON u.id = a.applicant_id \
             WHERE a.posting_id = $1 AND ($2::TEXT IS NULL OR a.status = $2) \
             ORDER BY {order} \
             LIMIT $4 OFFSET $5",
            order = sort.order_by_clause(),
        );
        sqlx::query_as::<_, ApplicationListItem>(&query)
            .bind(posting_id)
            .bind(status.map(ApplicationStatus::as_str))
            .bind(UNKNOWN_APPLICANT_NAME)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total matching [`Self::list_for_posting`] before pagination.
    pub async fn count_for_posting(
        pool: &PgPool,
        posting_id: DbId,
        status: Option<ApplicationStatus>,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM applications \
             WHERE posting_id = $1 AND ($2::TEXT IS NULL OR status = $2)",
        )
        .bind(posting_id)
        .bind(status.map(ApplicationStatus::as_str))
        .fetch_one(pool)
        .await
    }

    /// Every question of the posting with this application's answer, in
    /// question order. Unanswered questions carry `NULL` answer fields.
    pub async fn answered_questions(
        pool: &PgPool,
        application_id: DbId,
        posting_id: DbId,
    ) -> Result<Vec<AnsweredQuestion>, sqlx::Error> {
        sqlx::query_as::<_, AnsweredQuestion>(
            "SELECT q.id AS question_id, q.question_type, q.question_content, \
                    q.is_required, q.choices, \
                    aa.id AS answer_id, aa.answer_content \
             FROM posting_questions q \
             LEFT JOIN application_answers aa \
                ON aa.posting_question_id = q.id AND aa.application_id = $1 \
             WHERE q.posting_id = $2 \
             ORDER BY q.sort_order, q.id",
        )
        .bind(application_id)
        .bind(posting_id)
        .fetch_all(pool)
        .await
    }

    /// One page of the applicant's own applications, newest first.
    pub async fn list_for_applicant(
        pool: &PgPool,
        applicant_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MyApplication>, sqlx::Error> {
        sqlx::query_as::<_, MyApplication>(
            "SELECT a.id, a.posting_id, p.title AS posting_title, \
                    p.image_url AS posting_image_url, \
                    a.status, a.created_at, a.updated_at \
             FROM applications a \
             JOIN postings p ON p.id = a.posting_id \
             WHERE a.applicant_id = $1 \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(applicant_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_applicant(
        pool: &PgPool,
        applicant_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM applications WHERE applicant_id = $1")
            .bind(applicant_id)
            .fetch_one(pool)
            .await
    }

    /// Postings the user was accepted into, most recent application first.
    pub async fn recent_accepted_projects(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<RecentProject>, sqlx::Error> {
        sqlx::query_as::<_, RecentProject>(
            "SELECT p.id, p.title, p.image_url \
             FROM applications a \
             JOIN postings p ON p.id = a.posting_id \
             WHERE a.applicant_id = $1 AND a.status = $2 \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $3",
        )
        .bind(user_id)
        .bind(ApplicationStatus::Accepted.as_str())
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
