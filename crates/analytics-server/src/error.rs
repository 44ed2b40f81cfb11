use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use provider::ProviderError;
use serde_json::json;
use thiserror::Error;
use tracing;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Provider(ProviderError::NotFound(symbol)) => (
                StatusCode::NOT_FOUND,
                format!("Asset {} not found", symbol),
            ),
            AppError::Provider(err) => {
                tracing::error!(error = ?err, "Provider error.");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The price/profile provider is unavailable".to_string(),
                )
            }
            AppError::Analytics(err) => (StatusCode::NOT_FOUND, err.to_string()),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
