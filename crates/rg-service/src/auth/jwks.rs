//! Key resolution from the authority's published key set.
//!
//! The resolver fetches the authority's JWKS document, selects the first
//! key usable for RS256 verification, and caches it for the process
//! lifetime. There is no TTL refresh: the key is resolved once (at startup
//! or lazily on first use) and reused by every request thereafter. A failed
//! resolution is never papered over with a stale key; the error propagates
//! to the caller.

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::instrument;

/// The one signing algorithm this service accepts.
const SUPPORTED_ALGORITHM: &str = "RS256";

/// Key descriptor from the authority's JWKS endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    /// Key type (e.g. "RSA").
    pub kty: String,

    /// Key ID.
    pub kid: String,

    /// Algorithm the key is published for.
    #[serde(default)]
    pub alg: Option<String>,

    /// RSA modulus (base64url encoded).
    #[serde(default)]
    pub n: Option<String>,

    /// RSA public exponent (base64url encoded).
    #[serde(default)]
    pub e: Option<String>,

    /// Key use (should be "sig" for signing).
    #[serde(default, rename = "use")]
    pub key_use: Option<String>,
}

/// JWKS response from the authority.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksResponse {
    /// Key descriptors, in the order the authority published them.
    pub keys: Vec<Jwk>,
}

/// Errors raised while resolving the authority's signing key.
#[derive(Debug, Error)]
pub enum KeyResolutionError {
    #[error("Key endpoint request failed: {0}")]
    TransportFailure(String),

    #[error("Key endpoint returned a malformed response: {0}")]
    MalformedResponse(String),

    #[error("No RS256 key in the authority key set")]
    NoMatchingAlgorithm,
}

/// Verification key material resolved from the authority.
///
/// Immutable once resolved; shared read-only across all concurrent
/// validations.
#[derive(Clone)]
pub struct SigningKey {
    /// Key ID as published by the authority.
    pub kid: String,

    /// Algorithm the key verifies.
    pub algorithm: Algorithm,

    /// Verification key material.
    pub decoding_key: DecodingKey,
}

/// Resolver for the authority's signing key.
///
/// Thread-safe: the cache is written once by whichever caller resolves
/// first and read by everyone after that.
pub struct KeyResolver {
    /// URL to the authority's JWKS endpoint.
    jwks_url: String,

    /// HTTP client for fetching the key set.
    http_client: reqwest::Client,

    /// Cached key; `None` until the first successful resolution.
    cache: RwLock<Option<SigningKey>>,
}

impl KeyResolver {
    /// Create a new resolver for the given JWKS endpoint.
    pub fn new(jwks_url: String) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(target: "rg.auth.jwks", error = %e, "Failed to build HTTP client with custom config, using defaults");
                reqwest::Client::new()
            });

        Self {
            jwks_url,
            http_client,
            cache: RwLock::new(None),
        }
    }

    /// Resolve the signing key, fetching from the authority if not yet cached.
    ///
    /// # Errors
    ///
    /// Returns [`KeyResolutionError::TransportFailure`] if the endpoint is
    /// unreachable or responds non-2xx, [`KeyResolutionError::MalformedResponse`]
    /// if the body cannot be parsed into usable key material, and
    /// [`KeyResolutionError::NoMatchingAlgorithm`] if no RS256 key is published.
    #[instrument(skip(self))]
    pub async fn resolve(&self) -> Result<SigningKey, KeyResolutionError> {
        {
            let cache = self.cache.read().await;
            if let Some(key) = cache.as_ref() {
                return Ok(key.clone());
            }
        }

        let key = self.fetch_key().await?;

        tracing::info!(
            target: "rg.auth.jwks",
            kid = %key.kid,
            "Signing key resolved"
        );

        // First writer wins; concurrent resolvers fetched the same key set.
        let mut cache = self.cache.write().await;
        Ok(cache.get_or_insert(key).clone())
    }

    /// Fetch the key set from the authority and select the RS256 key.
    async fn fetch_key(&self) -> Result<SigningKey, KeyResolutionError> {
        tracing::debug!(target: "rg.auth.jwks", url = %self.jwks_url, "Fetching key set from authority");

        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(target: "rg.auth.jwks", error = %e, "Failed to fetch key set");
                KeyResolutionError::TransportFailure(e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::error!(
                target: "rg.auth.jwks",
                status = %response.status(),
                "Key endpoint returned error"
            );
            return Err(KeyResolutionError::TransportFailure(format!(
                "key endpoint returned status {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response.json().await.map_err(|e| {
            tracing::error!(target: "rg.auth.jwks", error = %e, "Failed to parse key set response");
            KeyResolutionError::MalformedResponse(e.to_string())
        })?;

        select_signing_key(&jwks.keys)
    }
}

/// Select the first RS256 key from the published sequence.
///
/// The scan preserves the authority's ordering; there is no fallback to a
/// differently-typed key.
fn select_signing_key(keys: &[Jwk]) -> Result<SigningKey, KeyResolutionError> {
    let jwk = keys
        .iter()
        .find(|key| key.alg.as_deref() == Some(SUPPORTED_ALGORITHM))
        .ok_or(KeyResolutionError::NoMatchingAlgorithm)?;

    let modulus = jwk.n.as_ref().ok_or_else(|| {
        KeyResolutionError::MalformedResponse(format!("key {} is missing modulus", jwk.kid))
    })?;
    let exponent = jwk.e.as_ref().ok_or_else(|| {
        KeyResolutionError::MalformedResponse(format!("key {} is missing exponent", jwk.kid))
    })?;

    let decoding_key = DecodingKey::from_rsa_components(modulus, exponent).map_err(|e| {
        KeyResolutionError::MalformedResponse(format!(
            "key {} has invalid RSA components: {}",
            jwk.kid, e
        ))
    })?;

    Ok(SigningKey {
        kid: jwk.kid.clone(),
        algorithm: Algorithm::RS256,
        decoding_key,
    })
}
