//! Posting question sets.

use joba_core::error::CoreError;
use joba_core::question::validate_question;
use joba_core::types::DbId;
use joba_db::models::question::{CreatePostingQuestion, PostingQuestion};
use joba_db::repositories::{ApplicationRepo, PostingQuestionRepo, PostingRepo};
use sqlx::PgPool;

use crate::engine::not_found;
use crate::error::{is_foreign_key_violation, AppError, AppResult};

fn questions_locked() -> AppError {
    CoreError::Conflict(
        "Questions cannot be replaced once the posting has received applications".into(),
    )
    .into()
}

/// Replace a posting's whole question set. Only the owner may do this.
///
/// An empty list clears the set. Returns the stored questions in order.
/// Submitted answers reference the questions, so the set is frozen once the
/// posting has any application.
pub async fn replace_questions(
    pool: &PgPool,
    posting_id: DbId,
    caller: DbId,
    questions: &[CreatePostingQuestion],
) -> AppResult<Vec<PostingQuestion>> {
    let posting = PostingRepo::find_by_id(pool, posting_id)
        .await?
        .ok_or_else(|| not_found("Posting", posting_id))?;
    if posting.owner_id != caller {
        return Err(CoreError::Forbidden(
            "Only the posting owner can edit its questions".into(),
        )
        .into());
    }

    for question in questions {
        validate_question(
            question.question_type,
            &question.question_content,
            question.choices.as_deref(),
        )?;
    }

    if ApplicationRepo::count_for_posting(pool, posting_id, None).await? > 0 {
        return Err(questions_locked());
    }

    let stored = match PostingQuestionRepo::replace_all(pool, posting_id, questions).await {
        Ok(stored) => stored,
        // An application landed between the check and the delete.
        Err(err) if is_foreign_key_violation(&err, "fk_application_answers_") => {
            return Err(questions_locked())
        }
        Err(err) => return Err(err.into()),
    };
    tracing::info!(posting_id, count = stored.len(), "Posting questions replaced");
    Ok(stored)
}

/// Public question list for a posting, in insertion order.
pub async fn list_questions(pool: &PgPool, posting_id: DbId) -> AppResult<Vec<PostingQuestion>> {
    PostingRepo::find_by_id(pool, posting_id)
        .await?
        .ok_or_else(|| not_found("Posting", posting_id))?;
    Ok(PostingQuestionRepo::list_for_posting(pool, posting_id).await?)
}
