//! HTTP request handlers for the Resource Gateway.

pub mod health;
pub mod protected;
pub mod public;

pub use health::health_check;
pub use protected::{
    all_claims_protected, custom_claim_protected, protected_route, restricted_by_role,
    specific_claim_protected,
};
pub use public::public_route;
