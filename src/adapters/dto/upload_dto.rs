use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignUploadRequest {
    pub filename: String,
    #[serde(rename = "contentType", default)]
    pub content_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresignUploadResponse {
    #[serde(rename = "presignedUrl")]
    pub presigned_url: String,
    pub key: String,
    #[serde(rename = "publicUrl")]
    pub public_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarUploadRequest {
    pub filename: String,
    #[serde(rename = "contentType", default)]
    pub content_type: String,
    /// When sent, must name the caller.
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAvatarRequest {
    #[serde(rename = "avatarUrl")]
    pub avatar_url: String,
}
