//! Posting enums and derived fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Recruitment field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecruitmentField {
    Frontend,
    Backend,
    Planning,
    Design,
    DataAnalysis,
}

pub const VALID_RECRUITMENT_FIELDS: &[&str] =
    &["frontend", "backend", "planning", "design", "data_analysis"];

impl RecruitmentField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Planning => "planning",
            Self::Design => "design",
            Self::DataAnalysis => "data_analysis",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "frontend" => Ok(Self::Frontend),
            "backend" => Ok(Self::Backend),
            "planning" => Ok(Self::Planning),
            "design" => Ok(Self::Design),
            "data_analysis" => Ok(Self::DataAnalysis),
            other => Err(CoreError::Validation(format!(
                "Invalid recruitment field '{other}'. Must be one of: {}",
                VALID_RECRUITMENT_FIELDS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Headcount
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecruitmentHeadcount {
    #[serde(rename = "1-2")]
    OneToTwo,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "6-10")]
    SixToTen,
    #[serde(rename = "undecided")]
    Undecided,
}

pub const VALID_HEADCOUNTS: &[&str] = &["1-2", "3-5", "6-10", "undecided"];

impl RecruitmentHeadcount {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneToTwo => "1-2",
            Self::ThreeToFive => "3-5",
            Self::SixToTen => "6-10",
            Self::Undecided => "undecided",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "1-2" => Ok(Self::OneToTwo),
            "3-5" => Ok(Self::ThreeToFive),
            "6-10" => Ok(Self::SixToTen),
            "undecided" => Ok(Self::Undecided),
            other => Err(CoreError::Validation(format!(
                "Invalid recruitment headcount '{other}'. Must be one of: {}",
                VALID_HEADCOUNTS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Sort orders for the public posting list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingSort {
    #[default]
    Latest,
    /// Most applications first, then newest.
    Popular,
    Random,
}

impl PostingSort {
    /// SQL `ORDER BY` clause for the `postings p` alias.
    pub fn order_by_clause(self) -> &'static str {
        match self {
            Self::Latest => "p.created_at DESC, p.id DESC",
            Self::Popular => "application_count DESC, p.created_at DESC, p.id DESC",
            Self::Random => "random()",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "latest" => Ok(Self::Latest),
            "popular" => Ok(Self::Popular),
            "random" => Ok(Self::Random),
            other => Err(CoreError::Validation(format!(
                "Invalid sort '{other}'. Must be one of: latest, popular, random"
            ))),
        }
    }
}

/// Default page size for the posting list.
pub const DEFAULT_POSTING_PAGE_SIZE: i64 = 10;

/// Whether a posting still accepts applicants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecruitmentStatus {
    Open,
    Closed,
}

/// A posting is open until its deadline passes.
pub fn recruitment_status(deadline: Timestamp, now: Timestamp) -> RecruitmentStatus {
    if deadline < now {
        RecruitmentStatus::Closed
    } else {
        RecruitmentStatus::Open
    }
}

/// Parse a deadline given either as RFC 3339 or as a plain `YYYY-MM-DD`
/// date, which means the last second of that day in UTC.
pub fn parse_deadline(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(23, 59, 59))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid deadline '{raw}'. Use RFC 3339 or YYYY-MM-DD"
            ))
        })
}

/// Posting images must be served with an `image/*` content type.
pub fn validate_image_content_type(content_type: Option<&str>) -> Result<(), CoreError> {
    match content_type {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        _ => Err(CoreError::Validation(
            "Posting image must be an image file".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn field_and_headcount_names_round_trip() {
        for name in VALID_RECRUITMENT_FIELDS {
            assert_eq!(RecruitmentField::from_name(name).unwrap().as_str(), *name);
        }
        for name in VALID_HEADCOUNTS {
            assert_eq!(RecruitmentHeadcount::from_name(name).unwrap().as_str(), *name);
        }
        assert!(RecruitmentField::from_name("marketing").is_err());
        assert!(RecruitmentHeadcount::from_name("11+").is_err());
    }

    #[test]
    fn headcount_serde_matches_as_str() {
        let json = serde_json::to_string(&RecruitmentHeadcount::ThreeToFive).unwrap();
        assert_eq!(json, "\"3-5\"");
    }

    #[test]
    fn status_follows_deadline() {
        let now = Utc::now();
        assert_eq!(
            recruitment_status(now + Duration::days(1), now),
            RecruitmentStatus::Open
        );
        assert_eq!(
            recruitment_status(now - Duration::seconds(1), now),
            RecruitmentStatus::Closed
        );
    }

    #[test]
    fn sort_names_parse() {
        assert_eq!(PostingSort::from_name("popular").unwrap(), PostingSort::Popular);
        assert!(PostingSort::from_name("oldest").is_err());
    }

    #[test]
    fn deadline_accepts_rfc3339_and_plain_dates() {
        let ts = parse_deadline("2025-03-01T09:00:00+09:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        let ts = parse_deadline("2025-03-01").unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-03-01T23:59:59+00:00");

        assert!(parse_deadline("next friday").is_err());
    }

    #[test]
    fn image_content_type_is_checked() {
        assert!(validate_image_content_type(Some("image/png")).is_ok());
        assert!(validate_image_content_type(Some("application/pdf")).is_err());
        assert!(validate_image_content_type(None).is_err());
    }
}
