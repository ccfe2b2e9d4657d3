use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] tally_core::Error),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use tally_core::Error as Core;

        let (status, error_message) = match self {
            // Shown to the user as-is, without the category prefix
            ApiError::Core(Core::Format(e)) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Core(Core::Validation(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Core(Core::NotFound(_)) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Core(ref e) => {
                tracing::error!(error = %e, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
