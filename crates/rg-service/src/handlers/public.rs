//! Public route handler.

use axum::Json;
use serde::Serialize;

/// Response for routes that return a message only.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

/// Handler for GET /public
///
/// No gate is bound; anyone may call this route.
pub async fn public_route() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "This is a public test route.".to_string(),
    })
}
