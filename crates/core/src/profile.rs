//! Profile rules: onboarding tracks, career list parsing and grouping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// Number of accepted projects shown on a profile.
pub const RECENT_PROJECT_LIMIT: i64 = 2;

pub const VALID_TRACKS: &[&str] = &["frontend", "backend", "plan", "design", "data"];

/// Validate an onboarding track.
pub fn validate_track(track: &str) -> Result<(), CoreError> {
    if VALID_TRACKS.contains(&track) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid track '{track}'. Must be one of: {}",
            VALID_TRACKS.join(", ")
        )))
    }
}

/// One career entry as submitted in a profile update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerEntry {
    pub year: i32,
    pub description: String,
}

/// Parse the `careers` form field.
///
/// Accepts either a year-keyed object
/// (`{"2024": [{"description": "..."}]}`) or a flat list
/// (`[{"year": 2024, "description": "..."}]`).
pub fn parse_careers_json(raw: &str) -> Result<Vec<CareerEntry>, CoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| CoreError::Validation(format!("Invalid careers JSON: {e}")))?;

    match value {
        Value::Array(_) => serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Invalid careers list: {e}"))),
        Value::Object(by_year) => {
            let mut entries = Vec::new();
            for (year, items) in by_year {
                let year: i32 = year.trim().parse().map_err(|_| {
                    CoreError::Validation(format!("Invalid career year '{year}'"))
                })?;
                let items = items.as_array().ok_or_else(|| {
                    CoreError::Validation(format!("Careers for {year} must be a list"))
                })?;
                for item in items {
                    let description = item
                        .get("description")
                        .and_then(Value::as_str)
                        .ok_or_else(|| {
                            CoreError::Validation(format!(
                                "Career entry for {year} is missing a description"
                            ))
                        })?;
                    entries.push(CareerEntry {
                        year,
                        description: description.to_string(),
                    });
                }
            }
            Ok(entries)
        }
        _ => Err(CoreError::Validation(
            "Careers must be a JSON object or list".into(),
        )),
    }
}

/// A single stored career line, as shown on a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerItem {
    pub id: DbId,
    pub description: String,
}

/// All career lines for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CareerYear {
    pub year: i32,
    pub items: Vec<CareerItem>,
}

/// Group stored careers by year, newest year first, ids ascending within a year.
pub fn group_careers(rows: impl IntoIterator<Item = (DbId, i32, String)>) -> Vec<CareerYear> {
    let mut by_year: BTreeMap<i32, Vec<CareerItem>> = BTreeMap::new();
    for (id, year, description) in rows {
        by_year
            .entry(year)
            .or_default()
            .push(CareerItem { id, description });
    }

    by_year
        .into_iter()
        .rev()
        .map(|(year, mut items)| {
            items.sort_by_key(|item| item.id);
            CareerYear { year, items }
        })
        .collect()
}
