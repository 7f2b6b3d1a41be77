//! Resource Gateway error types.
//!
//! All errors map to appropriate HTTP status codes via the `IntoResponse`
//! impl. Error messages returned to clients are the mapped reason strings
//! only; underlying library errors are logged server-side.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Resource Gateway error type.
///
/// Maps to appropriate HTTP status codes:
/// - Unauthorized: 401 (token missing, invalid, expired, or key unavailable)
/// - Forbidden: 403 (token valid but a claim predicate denied access)
#[derive(Debug, Error)]
pub enum RgError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl RgError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RgError::Unauthorized(_) => 401,
            RgError::Forbidden(_) => 403,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for RgError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            RgError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", reason),
            RgError::Forbidden(reason) => (StatusCode::FORBIDDEN, "FORBIDDEN", reason),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) =
                "Bearer realm=\"resource-gateway\", error=\"invalid_token\"".parse()
            {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;

    // Helper function to read the response body as JSON
    async fn read_body_json(body: Body) -> serde_json::Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_display_unauthorized() {
        let error = RgError::Unauthorized("Token has expired".to_string());
        assert_eq!(format!("{}", error), "Unauthorized: Token has expired");
    }

    #[test]
    fn test_display_forbidden() {
        let error = RgError::Forbidden("Missing or invalid role tester".to_string());
        assert_eq!(
            format!("{}", error),
            "Forbidden: Missing or invalid role tester"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RgError::Unauthorized("test".to_string()).status_code(), 401);
        assert_eq!(RgError::Forbidden("test".to_string()).status_code(), 403);
    }

    #[tokio::test]
    async fn test_into_response_unauthorized() {
        let error = RgError::Unauthorized("Invalid audience".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Check WWW-Authenticate header
        let www_auth = response.headers().get("WWW-Authenticate");
        assert!(www_auth.is_some());
        let www_auth_str = www_auth.unwrap().to_str().unwrap();
        assert!(www_auth_str.contains("Bearer realm=\"resource-gateway\""));

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "INVALID_TOKEN");
        assert_eq!(body_json["error"]["message"], "Invalid audience");
    }

    #[tokio::test]
    async fn test_into_response_forbidden() {
        let error = RgError::Forbidden("Missing or invalid custom_claim".to_string());
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(response.headers().get("WWW-Authenticate").is_none());

        let body_json = read_body_json(response.into_body()).await;
        assert_eq!(body_json["error"]["code"], "FORBIDDEN");
        assert_eq!(
            body_json["error"]["message"],
            "Missing or invalid custom_claim"
        );
    }
}
