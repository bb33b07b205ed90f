use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Storage provider error: {0}")]
    ProviderError(String),
}

impl From<StorageError> for ApplicationError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(_) => ApplicationError::NotFound,
            StorageError::Unauthorized(msg)
            | StorageError::NetworkError(msg)
            | StorageError::InvalidConfiguration(msg)
            | StorageError::ProviderError(msg) => ApplicationError::StorageError(msg),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to fetch JWKS: {0}")]
    JwksFetch(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            AuthError::JwksFetch("Request timeout".to_string())
        } else if error.is_connect() {
            AuthError::JwksFetch(format!("Connection failed: {}", error))
        } else {
            AuthError::JwksFetch(error.to_string())
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidKey(error.to_string())
    }
}

impl From<AuthError> for ApplicationError {
    fn from(error: AuthError) -> Self {
        ApplicationError::InternalError(format!("Auth error: {}", error))
    }
}
