use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The analytics service answered with a non-success status.
    #[error("Upstream analytics service returned status {status}")]
    Upstream { status: u16 },
    /// The analytics service could not be reached at all.
    #[error("Upstream analytics service unreachable: {0}")]
    Unreachable(String),
    /// The analytics service answered with a body we could not parse.
    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),
}

/// Converts our custom `GatewayError` into an HTTP response.
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            GatewayError::Upstream { status } => (
                StatusCode::BAD_GATEWAY,
                format!("Analytics service returned status {}", status),
            ),
            GatewayError::Unreachable(detail) => {
                tracing::error!(detail, "Analytics service unreachable.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Analytics service unavailable".to_string(),
                )
            }
            GatewayError::InvalidResponse(detail) => {
                tracing::error!(detail, "Invalid analytics response body.");
                (
                    StatusCode::BAD_GATEWAY,
                    "Invalid response from analytics service".to_string(),
                )
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
