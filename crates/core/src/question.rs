//! Posting question types and question-set validation.
//!
//! A posting's question set is only ever written as a whole (delete all,
//! insert the new list), so validation runs over the complete incoming list
//! before anything is touched.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The closed set of question kinds a posting can ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    /// Single-line free text.
    ShortText,
    /// Multi-line free text.
    LongText,
    /// Pick from the question's `choices` list.
    Choices,
    /// The answer names an uploaded file; the stored answer is the file URL.
    Attachment,
}

/// All valid question type names, in declaration order.
pub const VALID_QUESTION_TYPES: &[&str] = &["SHORT_TEXT", "LONG_TEXT", "CHOICES", "ATTACHMENT"];

impl QuestionType {
    /// Database / wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "SHORT_TEXT",
            Self::LongText => "LONG_TEXT",
            Self::Choices => "CHOICES",
            Self::Attachment => "ATTACHMENT",
        }
    }

    /// Parse from the database `question_type` column.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "SHORT_TEXT" => Ok(Self::ShortText),
            "LONG_TEXT" => Ok(Self::LongText),
            "CHOICES" => Ok(Self::Choices),
            "ATTACHMENT" => Ok(Self::Attachment),
            other => Err(CoreError::Validation(format!(
                "Invalid question type '{other}'. Must be one of: {}",
                VALID_QUESTION_TYPES.join(", ")
            ))),
        }
    }

    pub fn is_choice_based(self) -> bool {
        matches!(self, Self::Choices)
    }
}

/// Validate a single incoming question definition.
///
/// - `question_content` must not be blank.
/// - `CHOICES` questions must carry a non-empty choice list.
/// - Non-choice questions must not carry choices.
pub fn validate_question(
    question_type: QuestionType,
    question_content: &str,
    choices: Option<&[String]>,
) -> Result<(), CoreError> {
    if question_content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Question content must not be empty".into(),
        ));
    }

    match (question_type.is_choice_based(), choices) {
        (true, None) => Err(CoreError::Validation(
            "CHOICES questions require at least one choice".into(),
        )),
        (true, Some(list)) if list.is_empty() => Err(CoreError::Validation(
            "CHOICES questions require at least one choice".into(),
        )),
        (false, Some(list)) if !list.is_empty() => Err(CoreError::Validation(format!(
            "{} questions cannot define choices",
            question_type.as_str()
        ))),
        _ => Ok(()),
    }
}

/// Normalise the stored choice list: only choice-based questions keep one.
pub fn normalize_choices(
    question_type: QuestionType,
    choices: Option<Vec<String>>,
) -> Option<Vec<String>> {
    if question_type.is_choice_based() {
        choices
    } else {
        None
    }
}
