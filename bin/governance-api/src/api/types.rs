use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use governance_cache::GovernanceError;
use serde::Serialize;

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status_code: u16,
    pub timestamp: String,
    pub message: String,
    pub path: String,
}

/// Failed request, rendered as an [`ErrorResponse`]
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub path: String,
}

impl ApiError {
    /// Map the service error taxonomy to an HTTP status.
    ///
    /// Server errors only expose their context; the source is logged.
    pub fn from_governance(err: GovernanceError, path: &str) -> Self {
        let (status, message) = match &err {
            GovernanceError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            GovernanceError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            GovernanceError::Server { context, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, context.clone())
            }
        };

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            tracing::error!(path, error = %err, "Request failed");
        } else {
            tracing::debug!(path, error = %err, "Request rejected");
        }

        Self {
            status,
            message,
            path: path.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status_code: self.status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            message: self.message,
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}
