use sqlx::{postgres::PgRow, FromRow, Row};

use crate::application::dto::stored_file_dto::StoredFileDTO;

impl FromRow<'_, PgRow> for StoredFileDTO {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let size: i64 = row.try_get("size")?;

        Ok(StoredFileDTO {
            id: row.try_get("id")?,
            owner_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            key: row.try_get("key")?,
            mime_type: row.try_get("type")?,
            size: size.max(0) as u64,
            created_at: Some(row.try_get("created_at")?),
        })
    }
}

impl StoredFileDTO {
    pub fn sanitize(&mut self) {
        self.size = std::cmp::min(self.size, i64::MAX as u64);
        self.name = self.name.trim().to_string();
    }
}
