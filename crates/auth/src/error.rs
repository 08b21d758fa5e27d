use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fanzone_core::storage::{repository_error_to_status_code, RepositoryError};
use thiserror::Error;

/// Auth errors for the fanzone_auth crate.
///
/// Wraps the core `AuthError` and adds the failures of the I/O side:
/// hashing, token signing and account storage.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Core(#[from] fanzone_core::auth::AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("invalid reset token")]
    InvalidToken,

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use fanzone_core::auth::AuthError as CoreError;

        let (status, message) = match &self {
            AuthError::Core(CoreError::SessionNotFound | CoreError::SessionExpired) => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            AuthError::InvalidToken => (StatusCode::BAD_REQUEST, self.to_string()),
            AuthError::Repository(err) => {
                let status = StatusCode::from_u16(repository_error_to_status_code(err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    tracing::error!(error = %err, "Auth storage error");
                    (status, "Internal server error".to_string())
                } else {
                    (status, self.to_string())
                }
            }
            AuthError::Core(CoreError::Storage(_)) | AuthError::Hash(_) | AuthError::Config(_) => {
                tracing::error!("Auth error: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
