//! Health check handler.

/// Liveness probe.
///
/// Returns plain `"OK"`. The gateway holds no connections worth probing;
/// readiness is established at startup when the signing key resolves.
pub async fn health_check() -> &'static str {
    "OK"
}
