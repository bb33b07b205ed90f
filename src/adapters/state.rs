use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::{
        repositories::{file_repository::FileRepository, user_repository::UserRepository},
        services::{AccessGuard, StorageService},
    },
    domain::config::storage::UploadSettings,
};

/// Everything a handler may touch, constructed once in `main` (or by a test)
/// and cloned per request.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub access_guard: AccessGuard,
    pub storage_service: Arc<dyn StorageService>,
    pub file_repository: Arc<dyn FileRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub upload_settings: UploadSettings,
}
