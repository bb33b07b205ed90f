use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    application::{error::ApplicationError, services::SessionResolver},
    domain::models::{
        session::{Credentials, Session},
        storage_key,
    },
};

#[derive(Clone)]
pub struct AccessGuard {
    resolver: Arc<dyn SessionResolver>,
}

impl AccessGuard {
    pub fn new(resolver: Arc<dyn SessionResolver>) -> Self {
        Self { resolver }
    }

    pub async fn authenticate(&self, credentials: &Credentials) -> Option<Session> {
        let session = self.resolver.resolve_session(credentials).await;
        if session.is_none() {
            debug!(
                provider = self.resolver.provider_name(),
                "No valid session on request"
            );
        }
        session
    }

    /// Pure prefix check against `uploads/<userId>/`.
    pub fn authorize_key_access(session: &Session, key: &str) -> bool {
        storage_key::is_owned_by(key, session.user_id())
    }

    pub fn require_key_access(session: &Session, key: &str) -> Result<(), ApplicationError> {
        Self::require(session, key, Self::authorize_key_access(session, key))
    }

    /// Same check against `avatars/<userId>/`.
    pub fn require_avatar_access(session: &Session, key: &str) -> Result<(), ApplicationError> {
        Self::require(
            session,
            key,
            storage_key::is_avatar_owned_by(key, session.user_id()),
        )
    }

    fn require(session: &Session, key: &str, allowed: bool) -> Result<(), ApplicationError> {
        if allowed {
            Ok(())
        } else {
            warn!(
                "User {} attempted to access foreign key '{}'",
                session.user_id(),
                key
            );
            Err(ApplicationError::Forbidden)
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.resolver.provider_name()
    }
}
