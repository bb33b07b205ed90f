use std::time::Duration;

use async_trait::async_trait;

use crate::application::error::ApplicationError;

/// Gateway to the backing object store. Bytes never pass through the
/// application server: callers receive time-limited URLs instead.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// URL for a direct `PUT` of the object bytes.
    async fn presign_upload(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> Result<String, ApplicationError>;

    /// URL for a direct `GET`. Callers must have authorized the key.
    async fn presign_download(&self, key: &str, ttl: Duration) -> Result<String, ApplicationError>;

    /// Removes the object. A missing object may surface as `NotFound`;
    /// callers decide whether that matters.
    async fn delete(&self, key: &str) -> Result<(), ApplicationError>;

    fn provider_name(&self) -> &'static str;
}
