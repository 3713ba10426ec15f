pub mod applications;
pub mod auth;
pub mod me;
pub mod notices;
pub mod postings;
pub mod profiles;
pub mod questions;
