use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum HubError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Caller is not allowed to access this resource")]
    Forbidden,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing, unknown or expired session token")]
    Unauthorized,

    #[error("Too many login attempts")]
    RateLimited,

    #[error("Snapshot persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for HubError {
    fn from(e: figment::Error) -> Self {
        HubError::Config(e.to_string())
    }
}

impl From<JsonRejection> for HubError {
    fn from(rejection: JsonRejection) -> Self {
        HubError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for HubError {
    fn from(rejection: PathRejection) -> Self {
        HubError::InvalidInput(rejection.body_text())
    }
}

impl HubError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        HubError::InvalidInput(reason.into())
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            HubError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", self.to_string()),
            HubError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", self.to_string()),
            HubError::InvalidInput(_) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", self.to_string())
            }
            HubError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                self.to_string(),
            ),
            HubError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", self.to_string()),
            HubError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMIT",
                self.to_string(),
            ),
            HubError::Persistence(_)
            | HubError::LockPoisoned
            | HubError::Blocking(_)
            | HubError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.".to_string(),
            ),
        };

        let body = ApiErrorBody {
            code: code.to_string(),
            message,
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
