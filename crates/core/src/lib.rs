//! Domain types and pure rules for the JOBA backend.
//!
//! Nothing in this crate performs I/O. The database and API crates call
//! into these modules to validate input and to decide state transitions
//! before anything is written.

pub mod application;
pub mod error;
pub mod identity;
pub mod pagination;
pub mod posting;
pub mod profile;
pub mod question;
pub mod types;
pub mod upload;
