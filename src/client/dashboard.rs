use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info};

use crate::{
    adapters::dto::file_dto::CreateFileRequest,
    client::{
        api::{FilesApi, UploadApi},
        error::UploadError,
        task::{LocalFile, UploadTask},
        uploader::Uploader,
        validation::UploadOptions,
    },
    domain::models::stored_file::StoredFile,
};

/// Icon category for a stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Other,
}

impl FileKind {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            FileKind::Image
        } else if mime_type.starts_with("video/") {
            FileKind::Video
        } else if mime_type.starts_with("audio/") {
            FileKind::Audio
        } else if mime_type.contains("pdf") || mime_type.contains("document") {
            FileKind::Document
        } else if mime_type.contains("zip") || mime_type.contains("archive") {
            FileKind::Archive
        } else {
            FileKind::Other
        }
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const MB: f64 = 1024.0 * 1024.0;
    let bytes = bytes as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else {
        format!("{:.1} KB", bytes / 1024.0)
    }
}

/// The signed-in user's file manager: the stored file list plus an uploader
/// whose successful tasks are persisted as metadata.
pub struct Dashboard {
    files_api: Arc<dyn FilesApi>,
    uploader: Uploader,
    files: Vec<StoredFile>,
}

impl Dashboard {
    pub fn new(files_api: Arc<dyn FilesApi>, upload_api: Arc<dyn UploadApi>) -> Self {
        Self::with_uploader(
            files_api,
            Uploader::new(upload_api, UploadOptions::dashboard_defaults()),
        )
    }

    pub fn with_uploader(files_api: Arc<dyn FilesApi>, uploader: Uploader) -> Self {
        Self {
            files_api,
            uploader,
            files: Vec::new(),
        }
    }

    pub fn files(&self) -> &[StoredFile] {
        &self.files
    }

    pub fn uploader(&self) -> &Uploader {
        &self.uploader
    }

    pub async fn refresh(&mut self) -> Result<(), UploadError> {
        self.files = self.files_api.list_files().await?;
        Ok(())
    }

    /// Uploads concurrently; each file is recorded as soon as its own
    /// transfer finishes. Records that were saved are prepended even when
    /// another one fails; the first persistence error is returned.
    pub async fn upload_files(
        &mut self,
        files: Vec<LocalFile>,
    ) -> Result<Vec<StoredFile>, UploadError> {
        let uploader = &self.uploader;
        let files_api = self.files_api.as_ref();
        let results = join_all(files.into_iter().map(|file| async move {
            let task = uploader.upload(file).await.ok()?;
            let saved = persist(files_api, &task).await;
            Some((task, saved))
        }))
        .await;

        let mut stored = Vec::new();
        let mut first_error = None;
        for (task, saved) in results.into_iter().flatten() {
            match saved {
                Ok(file) => {
                    self.files.insert(0, file.clone());
                    stored.push(file);
                }
                Err(e) => {
                    // The object stays in storage without a metadata row.
                    error!("Failed to save metadata for {}: {}", task.file.name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(stored),
        }
    }

    pub async fn delete(&mut self, key: &str) -> Result<(), UploadError> {
        self.files_api.delete_file(key).await?;
        self.files.retain(|f| f.key != key);
        info!("Removed {} from the file list", key);
        Ok(())
    }

    /// Authenticated proxy path that redirects to a presigned download.
    pub fn download_url(key: &str) -> String {
        format!("/api/files/{}", key)
    }
}

async fn persist(files_api: &dyn FilesApi, task: &UploadTask) -> Result<StoredFile, UploadError> {
    let key = task
        .key
        .clone()
        .ok_or_else(|| UploadError::PersistenceFailed("upload has no key".to_string()))?;
    let request = CreateFileRequest {
        id: task.id.clone(),
        name: task.file.name.clone(),
        key,
        mime_type: task.file.effective_content_type().to_string(),
        size: task.file.size(),
    };
    files_api.persist_file(&request).await
}
