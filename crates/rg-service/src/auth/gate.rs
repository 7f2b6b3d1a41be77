//! Authorization gate.
//!
//! Binds token validation and an optional claim predicate into one
//! deterministic allow/deny decision: authenticate first (401 on any
//! validation failure), then authorize (403 on predicate denial). Every
//! call is a single pass; there are no retries at this layer.

use crate::auth::claims::ClaimSet;
use crate::auth::jwks::KeyResolver;
use crate::auth::jwt::TokenValidator;
use crate::auth::predicate::Predicate;
use crate::errors::RgError;
use std::sync::Arc;
use tracing::instrument;

/// Gate in front of protected operations.
pub struct AuthorizationGate {
    /// Resolver for the authority's signing key.
    resolver: Arc<KeyResolver>,

    /// Validator carrying the audience and scope policy.
    validator: TokenValidator,
}

impl AuthorizationGate {
    /// Create a gate from a shared key resolver and a validator.
    pub fn new(resolver: Arc<KeyResolver>, validator: TokenValidator) -> Self {
        Self {
            resolver,
            validator,
        }
    }

    /// Decide whether the presented token may pass.
    ///
    /// Authentication failures (unresolvable key, invalid token) yield 401;
    /// a predicate denial on an otherwise valid token yields 403. On allow,
    /// the full claim set is handed back to the caller.
    #[instrument(skip_all)]
    pub async fn authorize(
        &self,
        token: &str,
        predicate: Option<&Predicate>,
    ) -> Result<ClaimSet, RgError> {
        // Authentication: resolve the cached key and validate the token
        let key = self.resolver.resolve().await.map_err(|e| {
            tracing::warn!(target: "rg.auth.gate", error = %e, "Signing key unavailable");
            RgError::Unauthorized("Authorization authority unavailable".to_string())
        })?;

        let claims = self.validator.validate(token, &key).map_err(|kind| {
            tracing::debug!(target: "rg.auth.gate", kind = ?kind, "Token rejected");
            RgError::Unauthorized(kind.to_string())
        })?;

        // Authorization: run the bound predicate, if any
        if let Some(predicate) = predicate {
            predicate.evaluate(&claims).map_err(|denial| {
                tracing::debug!(target: "rg.auth.gate", reason = %denial.reason, "Predicate denied access");
                RgError::Forbidden(denial.reason)
            })?;
        }

        Ok(claims)
    }
}
