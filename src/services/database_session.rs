use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    application::{repositories::session_repository::SessionRepository, services::SessionResolver},
    domain::{
        config::auth::DatabaseAuthConfig,
        models::session::{Credentials, Session},
    },
};

/// Resolves opaque session tokens issued by a server-side auth library that
/// keeps its sessions in the application database.
pub struct DatabaseSessionResolver {
    sessions: Arc<dyn SessionRepository>,
    cookie_name: String,
}

impl DatabaseSessionResolver {
    pub fn new(sessions: Arc<dyn SessionRepository>, config: &DatabaseAuthConfig) -> Self {
        Self {
            sessions,
            cookie_name: config.cookie_name.clone(),
        }
    }

    /// Signed cookies carry `<token>.<signature>`; only the token is stored.
    fn session_token<'a>(&self, credentials: &'a Credentials) -> Option<&'a str> {
        if let Some(bearer) = credentials.bearer_token.as_deref().filter(|t| !t.is_empty()) {
            return Some(bearer);
        }
        credentials
            .cookie(&self.cookie_name)
            .and_then(|value| value.split('.').next())
            .filter(|t| !t.is_empty())
    }
}

#[async_trait]
impl SessionResolver for DatabaseSessionResolver {
    async fn resolve_session(&self, credentials: &Credentials) -> Option<Session> {
        let token = self.session_token(credentials)?;

        match self.sessions.find_active_session(token).await {
            Ok(Some(session)) if !session.user.id.is_empty() => Some(session),
            Ok(_) => {
                debug!("Session token not found or expired");
                None
            }
            Err(e) => {
                error!("Session lookup failed: {:?}", e);
                None
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "database"
    }
}
