// Error type shared by the HTTP handlers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

pub const INVALID_QUERY_MESSAGE: &str = "Missing or invalid 'input' parameter.";
pub const MISSING_API_KEY_MESSAGE: &str = "API Key is missing from environment variables.";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {}", INVALID_QUERY_MESSAGE)]
    InvalidQuery,

    #[error("Configuration error: {}", MISSING_API_KEY_MESSAGE)]
    MissingApiKey,

    /// Upstream answered with a non-success status; carries its JSON body.
    #[error("Upstream error: {0}")]
    Upstream(Value),

    /// Anything unexpected. The message is logged and never sent to the caller.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidQuery => StatusCode::BAD_REQUEST,
            AppError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            // Every upstream failure collapses to 404 regardless of its real status.
            AppError::Upstream(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::materials::SourceError> for AppError {
    fn from(err: crate::materials::SourceError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::InvalidQuery => json!({ "error": INVALID_QUERY_MESSAGE }),
            AppError::MissingApiKey => json!({ "error": MISSING_API_KEY_MESSAGE }),
            AppError::Upstream(body) => json!({ "error": body }),
            AppError::Internal(message) => {
                error!(error = %message, "Error fetching data from Materials Project API");
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;
