//! Authentication primitives.
//!
//! - [`jwt`] -- bearer-token verification against the shared auth secret.

pub mod jwt;
