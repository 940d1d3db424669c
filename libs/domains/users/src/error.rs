use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::error_response;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User with email '{0}' already exists")]
    AlreadyExists(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    /// Caller-correctable condition (4xx)
    pub fn is_client_error(&self) -> bool {
        matches!(self, UserError::InvalidUser(_) | UserError::NotFound(_))
    }

    /// Only DELETE reports an unknown id as 404; for other operations it is
    /// a failure of the request as a whole.
    pub fn not_found_as_internal(self) -> Self {
        match self {
            UserError::NotFound(id) => UserError::Internal(format!("User {} not found", id)),
            other => other,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        match &self {
            UserError::InvalidUser(reason) => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_user",
                format!("Provided user isn't valid: {}", reason),
            ),
            UserError::NotFound(id) => error_response(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("User {} not found", id),
            ),
            UserError::AlreadyExists(email) => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "already_exists",
                format!("User with email '{}' already exists", email),
            ),
            UserError::PasswordHash(msg) => {
                tracing::error!("Password hash error: {}", msg);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred",
                )
            }
            UserError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        }
    }
}
