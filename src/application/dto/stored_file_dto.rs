use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::stored_file::StoredFile;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoredFileDTO {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub key: String,
    pub mime_type: String,
    pub size: u64,
    /// Assigned by the store on insert when absent.
    pub created_at: Option<DateTime<Utc>>,
}

impl From<StoredFile> for StoredFileDTO {
    fn from(value: StoredFile) -> Self {
        StoredFileDTO {
            id: value.id,
            owner_id: value.owner_id,
            name: value.name,
            key: value.key,
            mime_type: value.mime_type,
            size: value.size,
            created_at: Some(value.created_at),
        }
    }
}

impl From<StoredFileDTO> for StoredFile {
    fn from(value: StoredFileDTO) -> Self {
        StoredFile {
            id: value.id,
            owner_id: value.owner_id,
            name: value.name,
            key: value.key,
            mime_type: value.mime_type,
            size: value.size,
            created_at: value.created_at.unwrap_or_else(Utc::now),
        }
    }
}
