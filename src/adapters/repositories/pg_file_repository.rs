use async_trait::async_trait;
use sqlx::query_as;

use crate::{
    adapters::repositories::database_error,
    application::{
        dto::stored_file_dto::StoredFileDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::stored_file::StoredFile,
};

pub struct PgFileRepository {
    pool: sqlx::PgPool,
}

impl PgFileRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn list_files(&self, owner_id: &str) -> Result<Vec<StoredFile>, ApplicationError> {
        let query = r#"
            SELECT * FROM files
            WHERE user_id = $1
            ORDER BY created_at DESC
        "#;

        let rows: Vec<StoredFileDTO> = query_as::<_, StoredFileDTO>(query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn insert_file(&self, file: StoredFileDTO) -> Result<StoredFile, ApplicationError> {
        let mut file = file;
        file.sanitize();

        let query = r#"
            INSERT INTO files (id, user_id, name, key, type, size)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
        "#;

        let created: StoredFileDTO = query_as::<_, StoredFileDTO>(query)
            .bind(&file.id)
            .bind(&file.owner_id)
            .bind(&file.name)
            .bind(&file.key)
            .bind(&file.mime_type)
            .bind(file.size as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(created.into())
    }

    async fn delete_file_by_key(
        &self,
        key: &str,
    ) -> Result<Option<StoredFile>, ApplicationError> {
        let query = "DELETE FROM files WHERE key = $1 RETURNING *";

        let deleted: Option<StoredFileDTO> = query_as::<_, StoredFileDTO>(query)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        Ok(deleted.map(|dto| dto.into()))
    }
}
