use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::{
    adapters::repositories::database_error,
    application::{error::ApplicationError, repositories::session_repository::SessionRepository},
    domain::models::{session::Session, user::User},
};

pub struct PgSessionRepository {
    pool: sqlx::PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_active_session(
        &self,
        token: &str,
    ) -> Result<Option<Session>, ApplicationError> {
        let query = r#"
            SELECT u.id, u.email, u.name, u.image, u.created_at, u.updated_at,
                   s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
        "#;

        let row = sqlx::query(query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user: User = sqlx::FromRow::from_row(&row).map_err(database_error)?;
        let expires_at: DateTime<Utc> = row.try_get("expires_at").map_err(database_error)?;

        Ok(Some(Session {
            user,
            expires_at: Some(expires_at),
        }))
    }
}
