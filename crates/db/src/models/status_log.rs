//! Application status audit log.

use joba_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `application_status_logs` table. Rows are never updated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ApplicationStatusLog {
    pub id: DbId,
    pub application_id: DbId,
    pub previous_status: String,
    pub new_status: String,
    pub changed_by: DbId,
    pub change_reason: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateStatusLog<'a> {
    pub application_id: DbId,
    pub previous_status: &'a str,
    pub new_status: &'a str,
    pub changed_by: DbId,
    pub change_reason: Option<&'a str>,
}
