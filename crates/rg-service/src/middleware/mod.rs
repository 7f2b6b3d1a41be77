//! Middleware for the Resource Gateway.

pub mod auth;

pub use auth::{require_auth, AuthState, ClaimsExt};
