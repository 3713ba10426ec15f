//! Application lifecycle rules.
//!
//! Holds the closed status set, the transition table, and the submission
//! checks that must all pass before an application row is inserted:
//!
//! ```text
//! submitted --(owner decision)--> accepted | rejected
//! submitted --(applicant)-------> cancelled
//! ```
//!
//! `accepted`, `rejected` and `cancelled` are terminal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::question::QuestionType;
use crate::types::DbId;

/// Audit reason recorded when the posting owner opens an application.
pub const REASON_DETAIL_VIEW: &str = "detail view";

/// Audit reason recorded when the applicant withdraws.
pub const REASON_APPLICANT_CANCELLATION: &str = "applicant cancellation";

/// Display name used when an applicant has not set a nickname.
pub const UNKNOWN_APPLICANT_NAME: &str = "unknown";

/// Default page size for application lists.
pub const DEFAULT_APPLICATION_PAGE_SIZE: i64 = 20;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Submitted,
    Accepted,
    Rejected,
    Cancelled,
}

/// All valid status names.
pub const VALID_STATUSES: &[&str] = &["submitted", "accepted", "rejected", "cancelled"];

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from the database `status` column or a query parameter.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "submitted" => Ok(Self::Submitted),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Invalid application status '{other}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Submitted)
    }

    /// Statuses a posting owner may set through a decision.
    pub fn is_decision(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

/// Check an owner decision (`update_status`) against the current status.
pub fn validate_decision(
    current: ApplicationStatus,
    new_status: ApplicationStatus,
) -> Result<(), CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Validation(format!(
            "Application is already {} and can no longer change status",
            current.as_str()
        )));
    }
    if !new_status.is_decision() {
        return Err(CoreError::Validation(format!(
            "Status '{}' cannot be set by the posting owner. Must be one of: accepted, rejected",
            new_status.as_str()
        )));
    }
    Ok(())
}

/// Check an applicant cancellation against the current status.
pub fn validate_cancel(current: ApplicationStatus) -> Result<(), CoreError> {
    if current != ApplicationStatus::Submitted {
        return Err(CoreError::Validation(format!(
            "Only submitted applications can be cancelled (current status: {})",
            current.as_str()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Sort orders for a posting's application list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationSort {
    #[default]
    Newest,
    Oldest,
    /// Status ascending, then newest first.
    Status,
}

impl ApplicationSort {
    /// SQL `ORDER BY` clause for the `applications a` alias.
    pub fn order_by_clause(self) -> &'static str {
        match self {
            Self::Newest => "a.created_at DESC, a.id DESC",
            Self::Oldest => "a.created_at ASC, a.id ASC",
            Self::Status => "a.status ASC, a.created_at DESC, a.id DESC",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "status" => Ok(Self::Status),
            other => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Must be one of: newest, oldest, status"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Submission checks
// ---------------------------------------------------------------------------

/// The parts of a posting question the submission checks need.
#[derive(Debug, Clone, Copy)]
pub struct QuestionRef<'a> {
    pub id: DbId,
    pub question_type: QuestionType,
    pub content: &'a str,
    pub is_required: bool,
}

/// One answer as submitted by the applicant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerInput {
    pub posting_question_id: DbId,
    pub answer_content: String,
}

/// Validate a submission's answers against the posting's question set.
///
/// Checks run in order and the first failing check is reported:
///
/// 1. the posting has at least one question;
/// 2. every required question is answered (all missing texts are listed);
/// 3. every answer targets a question of this posting (all bad ids are listed);
/// 4. no question is answered twice.
pub fn validate_answers(
    questions: &[QuestionRef<'_>],
    answers: &[AnswerInput],
) -> Result<(), CoreError> {
    if questions.is_empty() {
        return Err(CoreError::Validation(
            "This posting has no questions configured".into(),
        ));
    }

    let answered: HashSet<DbId> = answers.iter().map(|a| a.posting_question_id).collect();

    let missing: Vec<&str> = questions
        .iter()
        .filter(|q| q.is_required && !answered.contains(&q.id))
        .map(|q| q.content)
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::Validation(format!(
            "Please answer the following required questions: {}",
            missing.join(", ")
        )));
    }

    let valid: HashSet<DbId> = questions.iter().map(|q| q.id).collect();
    let invalid: Vec<String> = answers
        .iter()
        .filter(|a| !valid.contains(&a.posting_question_id))
        .map(|a| a.posting_question_id.to_string())
        .collect();
    if !invalid.is_empty() {
        return Err(CoreError::Validation(format!(
            "Answers reference questions that do not belong to this posting: [{}]",
            invalid.join(", ")
        )));
    }

    if answered.len() != answers.len() {
        return Err(CoreError::Validation(
            "Each question may be answered at most once".into(),
        ));
    }

    Ok(())
}

/// Find the uploaded file an attachment answer refers to.
///
/// Returns the index into `filenames` of the first file whose name equals the
/// answer content, or failing that, the first file whose name appears inside
/// the answer content. Files with an empty name never match.
pub fn match_attachment(answer_content: &str, filenames: &[&str]) -> Option<usize> {
    filenames
        .iter()
        .position(|name| !name.is_empty() && *name == answer_content)
        .or_else(|| {
            filenames
                .iter()
                .position(|name| !name.is_empty() && answer_content.contains(name))
        })
}

/// Resolve every attachment answer to an uploaded file index.
///
/// Returns, per answer, `Some(file_index)` for attachment answers and `None`
/// for text answers. Fails naming the first unresolved attachment answer.
pub fn resolve_attachments(
    questions: &[QuestionRef<'_>],
    answers: &[AnswerInput],
    filenames: &[&str],
) -> Result<Vec<Option<usize>>, CoreError> {
    answers
        .iter()
        .map(|answer| {
            let is_attachment = questions
                .iter()
                .find(|q| q.id == answer.posting_question_id)
                .is_some_and(|q| q.question_type == QuestionType::Attachment);
            if !is_attachment {
                return Ok(None);
            }
            match_attachment(&answer.answer_content, filenames)
                .map(Some)
                .ok_or_else(|| {
                    CoreError::Validation(format!(
                        "No uploaded file matches the attachment answer: {}",
                        answer.answer_content
                    ))
                })
        })
        .collect()
}
