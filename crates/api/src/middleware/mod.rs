//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated user from an access token.

pub mod auth;
