use async_trait::async_trait;

use crate::{
    application::{dto::user_dto::UserDTO, error::ApplicationError},
    domain::models::user::User,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>, ApplicationError>;
    /// Inserts the user if absent and returns the stored row either way.
    async fn ensure_user(&self, user: UserDTO) -> Result<User, ApplicationError>;
    async fn update_user(&self, user: UserDTO) -> Result<User, ApplicationError>;
}
