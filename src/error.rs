//! Error types for Gatehouse

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Email and password authentication is not enabled")]
    EmailPasswordDisabled,

    #[error("Sign up is disabled")]
    SignUpDisabled,

    #[error("Session storage is not available")]
    SessionStorageDisabled,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password too short (minimum {0} characters)")]
    PasswordTooShort(usize),

    #[error("Password too long (maximum {0} characters)")]
    PasswordTooLong(usize),

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// HTTP status used when the error reaches a handler boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidCredentials | Error::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            Error::EmailPasswordDisabled | Error::SignUpDisabled => StatusCode::FORBIDDEN,
            Error::SessionStorageDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Error::UserAlreadyExists => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidEmail | Error::PasswordTooShort(_) | Error::PasswordTooLong(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Infrastructure details stay in the logs
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(crate::api::routes::ApiResponse::err(message)),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_map_to_client_statuses() {
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::SignUpDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::PasswordTooShort(8).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UserAlreadyExists.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        let err = Error::Connection("refused".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("refused"));
    }
}
