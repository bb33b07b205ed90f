use async_trait::async_trait;

use crate::{application::error::ApplicationError, domain::models::session::Session};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Looks up an unexpired session by its opaque token.
    async fn find_active_session(&self, token: &str)
        -> Result<Option<Session>, ApplicationError>;
}
