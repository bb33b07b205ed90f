use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UploadError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Failed to get an upload URL: {0}")]
    PresignFailed(String),

    #[error("Upload failed: {0}")]
    TransferFailed(String),

    #[error("Failed to save file metadata: {0}")]
    PersistenceFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}
