//! JOBA API server library.
//!
//! Exposes config, state, routing and the request-side engine so the binary
//! and the integration tests build the same application.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod oauth;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
