//! Validated claim set.
//!
//! A [`ClaimSet`] holds every claim from a validated token, unmodified.
//! Claim values are viewed through one normalized lens: a claim's value is
//! a set of strings (a lone string scalar is a one-element set, an array
//! contributes its string elements), so predicates never care whether the
//! authority issued a scalar or a list. Claim values never appear in Debug
//! output.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Claims extracted from a validated token.
///
/// Produced once per successful validation and handed to the request as an
/// immutable value.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

/// Custom Debug implementation that lists claim names only.
///
/// Tokens carry identifiers and grants which should not be exposed in logs.
impl fmt::Debug for ClaimSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaimSet")
            .field("claims", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ClaimSet {
    /// Wrap a decoded token payload.
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    /// Raw value of a claim, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether the claim is present at all, regardless of value.
    pub fn has_claim(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Whether the claim's normalized value set contains `value`.
    ///
    /// A string scalar matches by equality; an array matches if any of its
    /// string elements equals `value`. Claims of any other shape never match.
    pub fn claim_contains(&self, name: &str, value: &str) -> bool {
        match self.0.get(name) {
            Some(Value::String(s)) => s == value,
            Some(Value::Array(items)) => items
                .iter()
                .any(|item| matches!(item, Value::String(s) if s == value)),
            _ => false,
        }
    }

    /// The `scope` claim as its space-delimited string, if it is one.
    pub fn scope(&self) -> Option<&str> {
        self.0.get("scope").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(claims: Map<String, Value>) -> Self {
        Self::new(claims)
    }
}
