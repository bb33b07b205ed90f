use async_trait::async_trait;

use crate::domain::models::session::{Credentials, Session};

/// Authentication capability. One adapter per identity backend, selected at
/// start-up; handlers only ever see this trait.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// `None` for absent, malformed, expired or unverifiable credentials.
    async fn resolve_session(&self, credentials: &Credentials) -> Option<Session>;

    fn provider_name(&self) -> &'static str;
}
