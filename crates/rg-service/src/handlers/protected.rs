//! Protected route handlers.
//!
//! Every handler here sits behind the auth middleware and receives the
//! validated claim set from request extensions. On allow, the full claim
//! set is handed back to the caller alongside a route message.

use crate::auth::ClaimSet;
use axum::{Extension, Json};
use serde::Serialize;
use tracing::instrument;

/// Response for protected routes: the route message plus the claims the
/// request was admitted with.
#[derive(Debug, Clone, Serialize)]
pub struct ProtectedResponse {
    /// Human-readable message.
    pub message: String,

    /// The validated claim set, unmodified.
    pub claims: ClaimSet,
}

fn respond(message: &str, claims: ClaimSet) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: message.to_string(),
        claims,
    })
}

/// Handler for GET /protected
///
/// Requires a valid token; no further predicate.
#[instrument(skip_all, name = "rg.handlers.protected")]
pub async fn protected_route(Extension(claims): Extension<ClaimSet>) -> Json<ProtectedResponse> {
    respond("This is a protected route", claims)
}

/// Handler for GET /restricted-to-role
///
/// Requires the `tester` role.
#[instrument(skip_all, name = "rg.handlers.restricted_by_role")]
pub async fn restricted_by_role(Extension(claims): Extension<ClaimSet>) -> Json<ProtectedResponse> {
    respond("This is a restricted route for role 'tester'", claims)
}

/// Handler for GET /custom_claim_protected
///
/// Requires the `custom_claim` claim to be present.
#[instrument(skip_all, name = "rg.handlers.custom_claim")]
pub async fn custom_claim_protected(
    Extension(claims): Extension<ClaimSet>,
) -> Json<ProtectedResponse> {
    respond("This is a protected route with custom claim check", claims)
}

/// Handler for GET /specific_claim_protected
///
/// Requires `custom_claim` to contain a specific value.
#[instrument(skip_all, name = "rg.handlers.specific_claim")]
pub async fn specific_claim_protected(
    Extension(claims): Extension<ClaimSet>,
) -> Json<ProtectedResponse> {
    respond("This is a protected route with specific claim check", claims)
}

/// Handler for GET /all_claims_protected
///
/// Requires every bound (claim, value) pair to hold.
#[instrument(skip_all, name = "rg.handlers.all_claims")]
pub async fn all_claims_protected(
    Extension(claims): Extension<ClaimSet>,
) -> Json<ProtectedResponse> {
    respond("This is a protected route with combined claim checks", claims)
}
