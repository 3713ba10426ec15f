//! Repository for the `posting_questions` table.

use joba_core::question::normalize_choices;
use joba_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{CreatePostingQuestion, PostingQuestion};

const COLUMNS: &str = "id, posting_id, question_type, question_content, is_required, \
    choices, sort_order, created_at, updated_at";

/// A posting's question set is only written by full replacement.
pub struct PostingQuestionRepo;

impl PostingQuestionRepo {
    /// Questions of a posting in insertion order.
    pub async fn list_for_posting(
        pool: &PgPool,
        posting_id: DbId,
    ) -> Result<Vec<PostingQuestion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM posting_questions \
             WHERE posting_id = $1 \
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, PostingQuestion>(&query)
            .bind(posting_id)
            .fetch_all(pool)
            .await
    }

    /// Delete every question of the posting and insert `questions` in order.
    ///
    /// Runs in one transaction; returns the inserted rows.
    pub async fn replace_all(
        pool: &PgPool,
        posting_id: DbId,
        questions: &[CreatePostingQuestion],
    ) -> Result<Vec<PostingQuestion>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM posting_questions WHERE posting_id = $1")
            .bind(posting_id)
            .execute(&mut *tx)
            .await?;

        let insert_query = format!(
            "INSERT INTO posting_questions \
                (posting_id, question_type, question_content, is_required, choices, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );

        let mut inserted = Vec::with_capacity(questions.len());
        for (index, question) in questions.iter().enumerate() {
            let choices = normalize_choices(question.question_type, question.choices.clone())
                .map(serde_json::Value::from);
            let row = sqlx::query_as::<_, PostingQuestion>(&insert_query)
                .bind(posting_id)
                .bind(question.question_type.as_str())
                .bind(&question.question_content)
                .bind(question.is_required)
                .bind(choices)
                .bind(index as i32)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
