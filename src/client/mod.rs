//! Upload orchestration on the requesting side: local validation, presign,
//! direct transfer to storage with progress, and the file-manager view that
//! persists metadata afterwards.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod task;
pub mod uploader;
pub mod validation;

pub use api::{ClientAuth, FilesApi, HttpApi, ProgressFn, UploadApi};
pub use dashboard::{format_file_size, Dashboard, FileKind};
pub use error::UploadError;
pub use task::{LocalFile, TaskList, UploadStatus, UploadTask};
pub use uploader::{UploadEvent, Uploader};
pub use validation::{AcceptRule, UploadOptions};
