use async_trait::async_trait;
use sqlx::{query_as, QueryBuilder};

use crate::{
    adapters::repositories::database_error,
    application::{
        dto::user_dto::UserDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::User,
};

pub struct PgUserRepository {
    pool: sqlx::PgPool,
}

impl PgUserRepository {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn get_user(&self, id: &str) -> Result<Option<User>, ApplicationError> {
        let query = "SELECT * FROM users WHERE id = $1";
        query_as::<_, User>(query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn ensure_user(&self, user: UserDTO) -> Result<User, ApplicationError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = r#"
            INSERT INTO users (id, email, name, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
            RETURNING *
        "#;
        query_as::<_, User>(query)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.name)
            .bind(&user.image)
            .fetch_one(&self.pool)
            .await
            .map_err(database_error)
    }

    async fn update_user(&self, user: UserDTO) -> Result<User, ApplicationError> {
        if !user.has_changes() {
            return self
                .get_user(&user.id)
                .await?
                .ok_or(ApplicationError::NotFound);
        }

        let mut builder = QueryBuilder::new("UPDATE users SET updated_at = NOW()");
        if let Some(email) = &user.email {
            builder.push(", email = ");
            builder.push_bind(email);
        }
        if let Some(name) = &user.name {
            builder.push(", name = ");
            builder.push_bind(name);
        }
        if let Some(image) = &user.image {
            builder.push(", image = ");
            builder.push_bind(image);
        }
        builder.push(" WHERE id = ");
        builder.push_bind(&user.id);
        builder.push(" RETURNING *");

        builder
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?
            .ok_or(ApplicationError::NotFound)
    }
}
