use std::time::Duration;

pub const DEFAULT_PRESIGN_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket_name: String,
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub force_path_style: bool,
    pub public_url: Option<String>,
    pub presign_ttl_secs: u64,
}

impl StorageConfig {
    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            presign_ttl: Duration::from_secs(self.presign_ttl_secs),
            public_url: self
                .public_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string()),
        }
    }
}

/// The non-secret part of the storage configuration that request handlers need.
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub presign_ttl: Duration,
    pub public_url: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            presign_ttl: Duration::from_secs(DEFAULT_PRESIGN_TTL_SECS),
            public_url: None,
        }
    }
}

impl UploadSettings {
    /// Direct bucket URL for public buckets, otherwise the authenticated
    /// redirect proxy.
    pub fn access_url(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("/api/files/{}", key),
        }
    }

    /// Avatars are public: the bucket URL when there is one, otherwise the
    /// unauthenticated `/api/avatars/...` redirect.
    pub fn avatar_url(&self, key: &str) -> String {
        match &self.public_url {
            Some(base) => format!("{}/{}", base, key),
            None => format!("/api/{}", key),
        }
    }
}
