//! Resource Gateway (RG) Service Library
//!
//! This library provides the core functionality for the Resource Gateway -
//! a stateless resource server that admits requests bearing access tokens
//! issued by an external identity authority:
//!
//! - Signing key resolution from the authority's published key set
//! - Token validation (signature, expiry, scope, audience)
//! - Claims-based authorization rules bound per route
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> middleware/auth.rs -> auth/gate.rs -> auth/{jwks,jwt,predicate}.rs
//! ```
//!
//! # Modules
//!
//! - `auth` - key resolution, token validation, predicates, and the gate
//! - `config` - service configuration from environment
//! - `errors` - error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - bearer extraction and gate invocation
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
