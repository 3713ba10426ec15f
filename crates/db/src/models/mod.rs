//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and patches
//! - Read-side projections (joins, aggregates) where a query needs them

pub mod application;
pub mod notice;
pub mod posting;
pub mod profile_career;
pub mod question;
pub mod status_log;
pub mod user;
