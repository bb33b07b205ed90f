use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::user::User;

/// Raw caller credentials as they arrived on the request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub bearer_token: Option<String>,
    pub cookies: HashMap<String, String>,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
            cookies: HashMap::new(),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Bearer header first, then the named cookie.
    pub fn token(&self, cookie_name: &str) -> Option<&str> {
        self.bearer_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.cookie(cookie_name).filter(|t| !t.is_empty()))
    }
}

/// Resolved identity of the current caller.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    #[serde(rename = "expiresAt", skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}
