//! Token validation.
//!
//! Validates a presented bearer token against the resolved signing key:
//! signature and time-based claims first, then the scope and audience
//! policies. Audience membership is checked manually after decoding so
//! audience policy can change without touching cryptographic trust.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only the resolved key's algorithm (RS256) is accepted
//! - Raw decode errors are logged at debug level and collapsed into
//!   [`FailureKind`] values whose messages leak nothing

use crate::auth::claims::ClaimSet;
use crate::auth::jwks::SigningKey;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Validation};
use std::collections::HashSet;
use thiserror::Error;
use tracing::instrument;

/// Maximum accepted token size in bytes. Larger tokens are rejected before
/// any decoding work.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// Why a token was rejected.
///
/// The Display strings are exactly what callers are shown; anything more
/// specific stays in server-side logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    /// The expiry claim is in the past.
    #[error("Token has expired")]
    Expired,

    /// Signature mismatch, structural corruption, or an unsupported
    /// algorithm.
    #[error("The access token is invalid")]
    BadSignature,

    /// A mandatory claim (expiry, audience) is absent.
    #[error("JWT claims validation failed")]
    MissingRequiredClaim(String),

    /// The token's scope set is not covered by the required scopes.
    #[error("Insufficient scope")]
    InsufficientScope,

    /// The expected audience is not a member of the token's audience claim.
    #[error("Invalid audience")]
    InvalidAudience,
}

/// Validator for presented bearer tokens.
///
/// Holds the audience and scope policy from configuration; the key comes in
/// per call so the validator itself stays free of shared mutable state.
pub struct TokenValidator {
    /// Audience value that must appear in every accepted token.
    expected_audience: String,

    /// Scopes a token's `scope` claim may draw from.
    required_scopes: HashSet<String>,
}

impl TokenValidator {
    /// Create a validator from the configured audience and the
    /// space-delimited required-scopes string.
    pub fn new(expected_audience: impl Into<String>, required_scopes: &str) -> Self {
        Self {
            expected_audience: expected_audience.into(),
            required_scopes: required_scopes
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Validate a token and return its claims.
    ///
    /// # Checks
    ///
    /// 1. Size check, then signature + `exp`/`nbf` verification against `key`;
    ///    `exp` and `aud` must be present
    /// 2. Scope policy, if the token carries a `scope` claim
    /// 3. Audience membership
    ///
    /// Validating the same token twice with the same key yields the same
    /// result, up to the expiry check's dependence on the current time.
    #[instrument(skip_all)]
    pub fn validate(&self, token: &str, key: &SigningKey) -> Result<ClaimSet, FailureKind> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(target: "rg.auth.jwt", size = token.len(), "Token exceeds size limit");
            return Err(FailureKind::BadSignature);
        }

        let mut validation = Validation::new(key.algorithm);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        // Audience is checked manually below, not during decoding
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "aud"]);

        let token_data =
            decode::<ClaimSet>(token, &key.decoding_key, &validation).map_err(map_decode_error)?;
        let claims = token_data.claims;

        self.check_scope(&claims)?;
        self.check_audience(&claims)?;

        tracing::debug!(target: "rg.auth.jwt", "Token validated successfully");
        Ok(claims)
    }

    /// Enforce the scope policy.
    ///
    /// A token without a `scope` claim skips the check entirely, and an
    /// empty required-scope set passes everything; a present claim must be
    /// a subset of (or equal to) the required scopes.
    fn check_scope(&self, claims: &ClaimSet) -> Result<(), FailureKind> {
        let Some(scope) = claims.scope() else {
            return Ok(());
        };

        if self.required_scopes.is_empty() {
            return Ok(());
        }

        if scope
            .split_whitespace()
            .all(|granted| self.required_scopes.contains(granted))
        {
            Ok(())
        } else {
            tracing::debug!(target: "rg.auth.jwt", "Token scope not covered by required scopes");
            Err(FailureKind::InsufficientScope)
        }
    }

    /// Enforce audience membership.
    ///
    /// The expected audience must be a member of the `aud` claim whether it
    /// is a scalar or a sequence. An absent or ill-typed `aud` fails here
    /// even though decoding already requires the claim; the manual check
    /// cannot be bypassed.
    fn check_audience(&self, claims: &ClaimSet) -> Result<(), FailureKind> {
        if claims.claim_contains("aud", &self.expected_audience) {
            Ok(())
        } else {
            tracing::debug!(target: "rg.auth.jwt", "Expected audience not present in token");
            Err(FailureKind::InvalidAudience)
        }
    }
}

/// Collapse decode-layer errors into the failure taxonomy.
fn map_decode_error(err: jsonwebtoken::errors::Error) -> FailureKind {
    match err.kind() {
        ErrorKind::ExpiredSignature => FailureKind::Expired,
        ErrorKind::MissingRequiredClaim(claim) => FailureKind::MissingRequiredClaim(claim.clone()),
        _ => {
            tracing::debug!(target: "rg.auth.jwt", error = %err, "Token verification failed");
            FailureKind::BadSignature
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use jsonwebtoken::{Algorithm, DecodingKey};
    use serde_json::{json, Value};

    fn claim_set(value: Value) -> ClaimSet {
        match value {
            Value::Object(map) => ClaimSet::new(map),
            _ => panic!("claim set fixture must be a JSON object"),
        }
    }

    fn validator(audience: &str, scopes: &str) -> TokenValidator {
        TokenValidator::new(audience, scopes)
    }

    fn throwaway_key() -> SigningKey {
        SigningKey {
            kid: "test-key".to_string(),
            algorithm: Algorithm::RS256,
            decoding_key: DecodingKey::from_rsa_components("AQAB", "AQAB")
                .expect("static components decode"),
        }
    }

    // =========================================================================
    // Scope policy
    // =========================================================================

    #[test]
    fn test_scope_subset_passes() {
        let v = validator("aud", "a b c");
        let claims = claim_set(json!({"scope": "a b"}));

        assert_eq!(v.check_scope(&claims), Ok(()));
    }

    #[test]
    fn test_scope_equal_set_passes() {
        let v = validator("aud", "a b");
        let claims = claim_set(json!({"scope": "b a"}));

        assert_eq!(v.check_scope(&claims), Ok(()));
    }

    #[test]
    fn test_scope_outside_required_fails() {
        let v = validator("aud", "a b");
        let claims = claim_set(json!({"scope": "a d"}));

        assert_eq!(v.check_scope(&claims), Err(FailureKind::InsufficientScope));
    }

    #[test]
    fn test_absent_scope_claim_skips_check() {
        let v = validator("aud", "a b");
        let claims = claim_set(json!({"sub": "user"}));

        assert_eq!(v.check_scope(&claims), Ok(()));
    }

    #[test]
    fn test_empty_required_scopes_pass_everything() {
        let v = validator("aud", "");
        let claims = claim_set(json!({"scope": "anything at-all"}));

        assert_eq!(v.check_scope(&claims), Ok(()));
    }

    #[test]
    fn test_empty_scope_claim_passes() {
        let v = validator("aud", "a b");
        let claims = claim_set(json!({"scope": ""}));

        assert_eq!(v.check_scope(&claims), Ok(()));
    }

    // =========================================================================
    // Audience policy
    // =========================================================================

    #[test]
    fn test_audience_scalar_match() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"aud": "expectedaudience"}));

        assert_eq!(v.check_audience(&claims), Ok(()));
    }

    #[test]
    fn test_audience_scalar_mismatch() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"aud": "someone-else"}));

        assert_eq!(v.check_audience(&claims), Err(FailureKind::InvalidAudience));
    }

    #[test]
    fn test_audience_sequence_membership() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"aud": ["other", "expectedaudience"]}));

        assert_eq!(v.check_audience(&claims), Ok(()));
    }

    #[test]
    fn test_audience_sequence_without_expected_fails() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"aud": ["alpha", "beta"]}));

        assert_eq!(v.check_audience(&claims), Err(FailureKind::InvalidAudience));
    }

    #[test]
    fn test_missing_audience_claim_fails() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"sub": "user"}));

        assert_eq!(v.check_audience(&claims), Err(FailureKind::InvalidAudience));
    }

    #[test]
    fn test_ill_typed_audience_claim_fails() {
        let v = validator("expectedaudience", "");
        let claims = claim_set(json!({"aud": 42}));

        assert_eq!(v.check_audience(&claims), Err(FailureKind::InvalidAudience));
    }

    // =========================================================================
    // Structural rejection (no valid signature needed)
    // =========================================================================

    #[test]
    fn test_oversized_token_rejected_before_parsing() {
        let v = validator("aud", "");
        let token = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);

        let result = v.validate(&token, &throwaway_key());
        assert_eq!(result.unwrap_err(), FailureKind::BadSignature);
    }

    #[test]
    fn test_token_at_size_limit_reaches_decoding() {
        let v = validator("aud", "");
        let token = "a".repeat(MAX_TOKEN_SIZE_BYTES);

        // Still garbage, but it must fail in the decoder, not the size gate
        let result = v.validate(&token, &throwaway_key());
        assert_eq!(result.unwrap_err(), FailureKind::BadSignature);
    }

    #[test]
    fn test_malformed_token_rejected() {
        let v = validator("aud", "");

        let result = v.validate("not.a.valid.jwt", &throwaway_key());
        assert_eq!(result.unwrap_err(), FailureKind::BadSignature);
    }

    #[test]
    fn test_failure_display_strings() {
        assert_eq!(FailureKind::Expired.to_string(), "Token has expired");
        assert_eq!(
            FailureKind::BadSignature.to_string(),
            "The access token is invalid"
        );
        assert_eq!(
            FailureKind::MissingRequiredClaim("aud".to_string()).to_string(),
            "JWT claims validation failed"
        );
        assert_eq!(
            FailureKind::InsufficientScope.to_string(),
            "Insufficient scope"
        );
        assert_eq!(FailureKind::InvalidAudience.to_string(), "Invalid audience");
    }
}
