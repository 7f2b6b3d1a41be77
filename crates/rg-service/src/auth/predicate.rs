//! Claims-based authorization rules.
//!
//! A [`Predicate`] is a pure rule over a validated [`ClaimSet`], built at
//! route-registration time and evaluated through one dispatch. Rules
//! compose by conjunction only: every condition must hold. All containment
//! tests go through the claim set's normalized set-of-strings view, so a
//! role issued as `"tester"` and one issued as `["tester"]` behave the
//! same.

use crate::auth::claims::ClaimSet;
use thiserror::Error;

/// Claim name that carries role membership.
const ROLE_CLAIM: &str = "role";

/// A predicate denial with the caller-facing reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PredicateDenial {
    /// Human-readable reason; carries no claim data.
    pub reason: String,
}

/// Authorization rule over a validated claim set.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// The `role` claim contains the given role.
    HasRole(String),

    /// The named claim exists, with any value.
    HasClaim(String),

    /// The named claim contains the given value.
    HasClaimValue { name: String, value: String },

    /// Every (name, value) pair is present; evaluation short-circuits on
    /// the first failing pair, in insertion order.
    HasAllClaimValues(Vec<(String, String)>),
}

impl Predicate {
    /// Rule: the `role` claim contains `role`.
    pub fn has_role(role: impl Into<String>) -> Self {
        Predicate::HasRole(role.into())
    }

    /// Rule: the claim `name` exists.
    pub fn has_claim(name: impl Into<String>) -> Self {
        Predicate::HasClaim(name.into())
    }

    /// Rule: the claim `name` contains `value`.
    pub fn has_claim_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Predicate::HasClaimValue {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Rule: every (name, value) pair holds.
    pub fn has_all_claim_values<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Predicate::HasAllClaimValues(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Evaluate the rule against a validated claim set.
    pub fn evaluate(&self, claims: &ClaimSet) -> Result<(), PredicateDenial> {
        match self {
            Predicate::HasRole(role) => {
                if claims.claim_contains(ROLE_CLAIM, role) {
                    Ok(())
                } else {
                    Err(denial(format!("Missing or invalid role {role}")))
                }
            }
            Predicate::HasClaim(name) => {
                if claims.has_claim(name) {
                    Ok(())
                } else {
                    Err(denial(format!("Missing or invalid {name}")))
                }
            }
            Predicate::HasClaimValue { name, value } => {
                if claims.claim_contains(name, value) {
                    Ok(())
                } else {
                    Err(denial(format!("Missing or invalid {name}")))
                }
            }
            Predicate::HasAllClaimValues(pairs) => {
                for (name, value) in pairs {
                    if !claims.claim_contains(name, value) {
                        return Err(denial(format!("Missing or invalid {name}")));
                    }
                }
                Ok(())
            }
        }
    }
}

fn denial(reason: String) -> PredicateDenial {
    PredicateDenial { reason }
}
