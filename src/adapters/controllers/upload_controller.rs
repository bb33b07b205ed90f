use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::{info, warn};

use crate::{
    adapters::dto::upload_dto::{PresignUploadRequest, PresignUploadResponse},
    application::{error::ApplicationError, services::StorageService},
    domain::{
        config::storage::UploadSettings,
        models::{session::Session, storage_key},
    },
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

pub struct UploadController;

impl UploadController {
    /// Issues a presigned PUT target under the caller's own key prefix.
    /// POST /api/upload
    /// Body: {"filename": "photo.png", "contentType": "image/png"}
    pub async fn create_presigned_upload(
        State(storage_service): State<Arc<dyn StorageService>>,
        State(upload_settings): State<UploadSettings>,
        Extension(session): Extension<Session>,
        Json(body): Json<PresignUploadRequest>,
    ) -> Result<Json<PresignUploadResponse>, ApplicationError> {
        let filename = body.filename.trim();
        if filename.is_empty() {
            warn!("Presign requested without a filename");
            return Err(ApplicationError::BadRequest(
                "filename is required".to_string(),
            ));
        }

        let content_type = match body.content_type.trim() {
            "" => FALLBACK_CONTENT_TYPE,
            ct => ct,
        };

        let key = storage_key::generate(session.user_id(), filename);
        let presigned_url = storage_service
            .presign_upload(&key, content_type, upload_settings.presign_ttl)
            .await?;

        info!(
            user_id = %session.user_id(),
            key = %key,
            content_type = %content_type,
            "Upload target issued"
        );

        Ok(Json(PresignUploadResponse {
            public_url: upload_settings.access_url(&key),
            presigned_url,
            key,
        }))
    }
}
