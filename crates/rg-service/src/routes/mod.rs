//! HTTP routes for the Resource Gateway.
//!
//! Builds the Axum router. Each protected route group gets its own
//! [`AuthState`] carrying the shared gate and the predicate bound at
//! registration time, so authorization rules live here, next to the routes
//! they guard, instead of inside the handlers.

use crate::auth::{AuthorizationGate, KeyResolver, Predicate, TokenValidator};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{require_auth, AuthState};
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - liveness probe - public, unversioned
/// - `/public` - public test route
/// - `/protected` - valid token required
/// - `/restricted-to-role` - valid token with role `tester`
/// - `/custom_claim_protected` - valid token carrying `custom_claim`
/// - `/specific_claim_protected` - valid token where `custom_claim`
///   contains `my_claim_value`
/// - `/all_claims_protected` - valid token satisfying every bound pair
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(config: &Config, resolver: Arc<KeyResolver>) -> Router {
    let validator = TokenValidator::new(config.expected_audience.clone(), &config.required_scopes);
    let gate = Arc::new(AuthorizationGate::new(resolver, validator));

    // One middleware state per route group, predicate bound at registration
    let guard = |predicate: Option<Predicate>| {
        middleware::from_fn_with_state(
            Arc::new(AuthState {
                gate: gate.clone(),
                predicate,
            }),
            require_auth,
        )
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/public", get(handlers::public_route));

    let protected_routes = Router::new()
        .route("/protected", get(handlers::protected_route))
        .route_layer(guard(None));

    let role_routes = Router::new()
        .route("/restricted-to-role", get(handlers::restricted_by_role))
        .route_layer(guard(Some(Predicate::has_role("tester"))));

    let custom_claim_routes = Router::new()
        .route(
            "/custom_claim_protected",
            get(handlers::custom_claim_protected),
        )
        .route_layer(guard(Some(Predicate::has_claim("custom_claim"))));

    let specific_claim_routes = Router::new()
        .route(
            "/specific_claim_protected",
            get(handlers::specific_claim_protected),
        )
        .route_layer(guard(Some(Predicate::has_claim_value(
            "custom_claim",
            "my_claim_value",
        ))));

    let all_claims_routes = Router::new()
        .route("/all_claims_protected", get(handlers::all_claims_protected))
        .route_layer(guard(Some(Predicate::has_all_claim_values([
            ("custom_claim", "my_claim_value"),
            ("role", "tester"),
        ]))));

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    public_routes
        .merge(protected_routes)
        .merge(role_routes)
        .merge(custom_claim_routes)
        .merge(specific_claim_routes)
        .merge(all_claims_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_build_routes_succeeds() {
        let vars = HashMap::from([(
            "AUTHORITY_BASE_URL".to_string(),
            "http://localhost:8080".to_string(),
        )]);
        let config = Config::from_vars(&vars).expect("Config should load");
        let resolver = Arc::new(KeyResolver::new(config.jwks_url()));

        // Router construction itself must not touch the network
        let _router = build_routes(&config, resolver);
    }
}
