use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Redirect,
    Extension, Json,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    adapters::dto::{
        file_dto::DeleteFileResponse,
        upload_dto::{AvatarUploadRequest, DeleteAvatarRequest, PresignUploadResponse},
    },
    application::{
        error::ApplicationError,
        services::{AccessGuard, StorageService},
    },
    domain::{
        config::storage::UploadSettings,
        models::{session::Session, storage_key},
    },
};

pub struct AvatarController;

impl AvatarController {
    /// Issues a presigned PUT for a new profile picture.
    /// POST /api/me/avatar
    /// Body: {"filename": "me.png", "contentType": "image/png", "userId"?: "..."}
    pub async fn create_avatar_upload(
        State(storage_service): State<Arc<dyn StorageService>>,
        State(upload_settings): State<UploadSettings>,
        Extension(session): Extension<Session>,
        Json(body): Json<AvatarUploadRequest>,
    ) -> Result<Json<PresignUploadResponse>, ApplicationError> {
        let filename = body.filename.trim();
        if filename.is_empty() {
            return Err(ApplicationError::BadRequest(
                "filename is required".to_string(),
            ));
        }
        if let Some(user_id) = &body.user_id {
            if user_id != session.user_id() {
                warn!(
                    "User {} attempted to upload an avatar for {}",
                    session.user_id(),
                    user_id
                );
                return Err(ApplicationError::Forbidden);
            }
        }

        let content_type = match body.content_type.trim() {
            "" => "application/octet-stream",
            ct => ct,
        };
        let key = storage_key::generate_avatar(
            session.user_id(),
            filename,
            Utc::now().timestamp_millis(),
        );
        let presigned_url = storage_service
            .presign_upload(&key, content_type, upload_settings.presign_ttl)
            .await?;

        info!(user_id = %session.user_id(), key = %key, "Avatar upload target issued");

        Ok(Json(PresignUploadResponse {
            public_url: upload_settings.avatar_url(&key),
            presigned_url,
            key,
        }))
    }

    /// Removes the caller's avatar named by its URL.
    /// DELETE /api/me/avatar
    /// Body: {"avatarUrl": "..."}
    pub async fn delete_avatar(
        State(storage_service): State<Arc<dyn StorageService>>,
        Extension(session): Extension<Session>,
        Json(body): Json<DeleteAvatarRequest>,
    ) -> Result<Json<DeleteFileResponse>, ApplicationError> {
        let key = storage_key::avatar_key_from_url(&body.avatar_url)
            .ok_or_else(|| ApplicationError::BadRequest("Invalid avatar URL".to_string()))?;
        AccessGuard::require_avatar_access(&session, &key)?;

        match storage_service.delete(&key).await {
            Ok(()) => info!("Avatar deleted: {}", key),
            Err(ApplicationError::NotFound) => warn!("Avatar {} already missing", key),
            Err(e) => return Err(e),
        }

        Ok(Json(DeleteFileResponse { success: true }))
    }

    /// Public redirect to a presigned GET for an avatar.
    /// GET /api/avatars/{*path}
    pub async fn download_avatar(
        State(storage_service): State<Arc<dyn StorageService>>,
        State(upload_settings): State<UploadSettings>,
        Path(path): Path<String>,
    ) -> Result<Redirect, ApplicationError> {
        let url = format!("/{}/{}", storage_key::AVATARS_ROOT, path);
        let key = storage_key::avatar_key_from_url(&url).ok_or(ApplicationError::NotFound)?;

        let url = storage_service
            .presign_download(&key, upload_settings.presign_ttl)
            .await?;

        Ok(Redirect::temporary(&url))
    }
}
