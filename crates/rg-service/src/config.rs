//! Resource Gateway configuration.
//!
//! Configuration is loaded from environment variables. The authority base
//! URL is the trust root for token validation and has no default; everything
//! else falls back to development values.

use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default server bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default authority realm.
pub const DEFAULT_AUTH_REALM: &str = "myrealm";

/// Default expected audience.
pub const DEFAULT_EXPECTED_AUDIENCE: &str = "expectedaudience";

/// Default required scopes (space-delimited).
pub const DEFAULT_REQUIRED_SCOPES: &str = "requiredscope";

/// Resource Gateway configuration.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Base URL of the identity authority that publishes signing keys.
    pub authority_base_url: String,

    /// Authority realm identifier.
    pub auth_realm: String,

    /// Audience value that must appear in every accepted token.
    pub expected_audience: String,

    /// Space-delimited scopes a token's `scope` claim may draw from.
    pub required_scopes: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let authority_base_url = vars
            .get("AUTHORITY_BASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("AUTHORITY_BASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let auth_realm = vars
            .get("AUTH_REALM")
            .cloned()
            .unwrap_or_else(|| DEFAULT_AUTH_REALM.to_string());

        let expected_audience = vars
            .get("EXPECTED_AUDIENCE")
            .cloned()
            .unwrap_or_else(|| DEFAULT_EXPECTED_AUDIENCE.to_string());

        let required_scopes = vars
            .get("REQUIRED_SCOPES")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REQUIRED_SCOPES.to_string());

        Ok(Config {
            bind_address,
            authority_base_url,
            auth_realm,
            expected_audience,
            required_scopes,
        })
    }

    /// URL of the authority's published-keys endpoint for the configured realm.
    pub fn jwks_url(&self) -> String {
        format!(
            "{}/auth/realms/{}/protocol/openid-connect/certs",
            self.authority_base_url.trim_end_matches('/'),
            self.auth_realm
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "AUTHORITY_BASE_URL".to_string(),
            "http://localhost:8080".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let vars = base_vars();

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.authority_base_url, "http://localhost:8080");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.auth_realm, DEFAULT_AUTH_REALM);
        assert_eq!(config.expected_audience, DEFAULT_EXPECTED_AUDIENCE);
        assert_eq!(config.required_scopes, DEFAULT_REQUIRED_SCOPES);
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:9000".to_string());
        vars.insert("AUTH_REALM".to_string(), "production".to_string());
        vars.insert("EXPECTED_AUDIENCE".to_string(), "my-api".to_string());
        vars.insert("REQUIRED_SCOPES".to_string(), "read write".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert_eq!(config.auth_realm, "production");
        assert_eq!(config.expected_audience, "my-api");
        assert_eq!(config.required_scopes, "read write");
    }

    #[test]
    fn test_from_vars_missing_authority_base_url() {
        let vars = HashMap::new();

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "AUTHORITY_BASE_URL"));
    }

    #[test]
    fn test_jwks_url_derivation() {
        let mut vars = base_vars();
        vars.insert("AUTH_REALM".to_string(), "tenant-a".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(
            config.jwks_url(),
            "http://localhost:8080/auth/realms/tenant-a/protocol/openid-connect/certs"
        );
    }

    #[test]
    fn test_jwks_url_strips_trailing_slash() {
        let vars = HashMap::from([(
            "AUTHORITY_BASE_URL".to_string(),
            "http://keycloak:8080/".to_string(),
        )]);

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(
            config.jwks_url(),
            "http://keycloak:8080/auth/realms/myrealm/protocol/openid-connect/certs"
        );
    }
}
