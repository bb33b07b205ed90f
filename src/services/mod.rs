mod database_session;
mod error;
mod jwt_session;
mod s3_storage;

pub use database_session::DatabaseSessionResolver;
pub use error::{AuthError, StorageError};
pub use jwt_session::{JwtSessionResolver, SessionClaims};
pub use s3_storage::S3StorageService;

use std::sync::Arc;

use crate::{
    application::{
        repositories::session_repository::SessionRepository,
        services::{SessionResolver, StorageService},
    },
    domain::config::{auth::AuthConfig, storage::StorageConfig},
};

pub fn create_storage_service(config: &StorageConfig) -> Arc<dyn StorageService> {
    Arc::new(S3StorageService::new(config))
}

/// Picks the session adapter named by the configuration. Business logic never
/// branches on the concrete type.
pub async fn create_session_resolver(
    config: &AuthConfig,
    sessions: Arc<dyn SessionRepository>,
) -> Result<Arc<dyn SessionResolver>, AuthError> {
    match config {
        AuthConfig::Jwt(jwt_config) => {
            let resolver = JwtSessionResolver::from_config(jwt_config).await?;
            Ok(Arc::new(resolver))
        }
        AuthConfig::Database(database_config) => {
            let resolver = DatabaseSessionResolver::new(sessions, database_config);
            Ok(Arc::new(resolver))
        }
    }
}
