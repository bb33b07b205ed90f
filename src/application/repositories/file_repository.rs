use async_trait::async_trait;

use crate::{
    application::{dto::stored_file_dto::StoredFileDTO, error::ApplicationError},
    domain::models::stored_file::StoredFile,
};

#[async_trait]
pub trait FileRepository: Send + Sync {
    /// Files owned by `owner_id`, newest first.
    async fn list_files(&self, owner_id: &str) -> Result<Vec<StoredFile>, ApplicationError>;

    /// Fails with `Conflict` when the id or key already exists.
    async fn insert_file(&self, file: StoredFileDTO) -> Result<StoredFile, ApplicationError>;

    /// Returns the removed row, or `None` when no row had that key.
    async fn delete_file_by_key(&self, key: &str)
        -> Result<Option<StoredFile>, ApplicationError>;
}
