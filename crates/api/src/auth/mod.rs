//! Authentication primitives.
//!
//! - [`jwt`] -- access and signup token generation and validation.

pub mod jwt;
