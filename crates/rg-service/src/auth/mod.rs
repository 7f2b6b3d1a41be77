//! Authentication and authorization for the Resource Gateway.
//!
//! This module validates bearer tokens issued by the external identity
//! authority and evaluates claims-based authorization rules.
//!
//! # Components
//!
//! - `jwks` - key resolution from the authority's published key set
//! - `jwt` - token validation (signature, time, scope, audience)
//! - `claims` - validated claim set with normalized claim values
//! - `predicate` - composable claims-based authorization rules
//! - `gate` - binds validation and a predicate into one allow/deny decision

pub mod claims;
pub mod gate;
pub mod jwks;
pub mod jwt;
pub mod predicate;

pub use claims::ClaimSet;
pub use gate::AuthorizationGate;
pub use jwks::{KeyResolutionError, KeyResolver, SigningKey};
pub use jwt::{FailureKind, TokenValidator};
pub use predicate::{Predicate, PredicateDenial};
