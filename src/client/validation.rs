use crate::client::{error::UploadError, task::LocalFile};

pub const DASHBOARD_ACCEPT: &str = "image/*,.pdf,.doc,.docx,.xls,.xlsx,.ppt,.pptx,.zip";
pub const DASHBOARD_MAX_SIZE: u64 = 50 * 1024 * 1024;

/// One entry of an accept list such as `"image/*,.pdf"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcceptRule {
    /// `.pdf`, stored lowercase with the dot.
    Extension(String),
    /// `image/*`, stored as `image/`.
    MimePrefix(String),
    Mime(String),
}

impl AcceptRule {
    pub fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            None
        } else if entry.starts_with('.') {
            Some(AcceptRule::Extension(entry.to_ascii_lowercase()))
        } else if let Some(prefix) = entry.strip_suffix("/*") {
            Some(AcceptRule::MimePrefix(format!("{}/", prefix)))
        } else {
            Some(AcceptRule::Mime(entry.to_string()))
        }
    }

    pub fn matches(&self, file: &LocalFile) -> bool {
        match self {
            AcceptRule::Extension(ext) => file.dotted_extension() == *ext,
            AcceptRule::MimePrefix(prefix) => file.content_type.starts_with(prefix.as_str()),
            AcceptRule::Mime(mime) => file.content_type == *mime,
        }
    }
}

/// Client-side limits. Best effort only; the server does not re-check them.
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub max_size: Option<u64>,
    pub accept: Vec<AcceptRule>,
}

impl UploadOptions {
    pub fn dashboard_defaults() -> Self {
        Self::default()
            .with_max_size(DASHBOARD_MAX_SIZE)
            .with_accept_list(DASHBOARD_ACCEPT)
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_accept_list(mut self, list: &str) -> Self {
        self.accept = list.split(',').filter_map(AcceptRule::parse).collect();
        self
    }

    pub fn validate(&self, file: &LocalFile) -> Result<(), UploadError> {
        // A zero limit means no limit.
        if let Some(max_size) = self.max_size.filter(|max| *max > 0) {
            if file.size() > max_size {
                let max_mb = max_size as f64 / 1024.0 / 1024.0;
                return Err(UploadError::ValidationFailed(format!(
                    "File size exceeds {:.1}MB",
                    max_mb
                )));
            }
        }

        if !self.accept.is_empty() && !self.accept.iter().any(|rule| rule.matches(file)) {
            return Err(UploadError::ValidationFailed(
                "File type is not allowed".to_string(),
            ));
        }

        Ok(())
    }
}
