use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Json,
};
use tracing::{info, warn};

use crate::{
    adapters::dto::file_dto::{CreateFileRequest, DeleteFileResponse},
    application::{
        dto::stored_file_dto::StoredFileDTO,
        error::ApplicationError,
        repositories::file_repository::FileRepository,
        services::{AccessGuard, StorageService},
    },
    domain::{
        config::storage::UploadSettings,
        models::{session::Session, stored_file::StoredFile},
    },
};

pub struct FileController;

impl FileController {
    /// GET /api/files
    pub async fn list_files(
        State(file_repo): State<Arc<dyn FileRepository>>,
        Extension(session): Extension<Session>,
    ) -> Result<Json<Vec<StoredFile>>, ApplicationError> {
        let files = file_repo.list_files(session.user_id()).await?;
        info!("Listed {} files for user {}", files.len(), session.user_id());
        Ok(Json(files))
    }

    /// Records metadata for an object the client has already uploaded.
    /// POST /api/files
    /// Body: {"id", "name", "key", "type", "size"}
    pub async fn create_file(
        State(file_repo): State<Arc<dyn FileRepository>>,
        Extension(session): Extension<Session>,
        Json(body): Json<CreateFileRequest>,
    ) -> Result<Json<StoredFile>, ApplicationError> {
        if body.id.trim().is_empty() {
            return Err(ApplicationError::BadRequest("id is required".to_string()));
        }
        if body.name.trim().is_empty() {
            return Err(ApplicationError::BadRequest("name is required".to_string()));
        }
        AccessGuard::require_key_access(&session, &body.key)?;

        let dto = StoredFileDTO {
            id: body.id,
            owner_id: session.user_id().to_string(),
            name: body.name,
            key: body.key,
            mime_type: body.mime_type,
            size: body.size,
            created_at: None,
        };

        let file = file_repo.insert_file(dto).await?;
        info!("File metadata stored: {} ({})", file.id, file.key);

        Ok(Json(file))
    }

    /// Redirects to a short-lived presigned GET for an owned key.
    /// GET /api/files/{*key}
    pub async fn download_file(
        State(storage_service): State<Arc<dyn StorageService>>,
        State(upload_settings): State<UploadSettings>,
        Extension(session): Extension<Session>,
        Path(key): Path<String>,
    ) -> Result<Redirect, ApplicationError> {
        AccessGuard::require_key_access(&session, &key)?;

        let url = storage_service
            .presign_download(&key, upload_settings.presign_ttl)
            .await?;

        Ok(Redirect::temporary(&url))
    }

    /// Removes the object, then its metadata row. Either being absent
    /// already is not an error.
    /// DELETE /api/files/{*key}
    pub async fn delete_file(
        State(storage_service): State<Arc<dyn StorageService>>,
        State(file_repo): State<Arc<dyn FileRepository>>,
        Extension(session): Extension<Session>,
        Path(key): Path<String>,
    ) -> Result<Json<DeleteFileResponse>, ApplicationError> {
        AccessGuard::require_key_access(&session, &key)?;

        match storage_service.delete(&key).await {
            Ok(()) => {}
            Err(ApplicationError::NotFound) => {
                warn!("Object {} already missing from storage", key);
            }
            Err(e) => return Err(e),
        }

        match file_repo.delete_file_by_key(&key).await? {
            Some(file) => info!("File deleted: {} ({})", file.id, key),
            None => warn!("No metadata row for deleted key {}", key),
        }

        Ok(Json(DeleteFileResponse { success: true }))
    }
}
