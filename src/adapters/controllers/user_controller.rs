use std::sync::Arc;

use axum::{extract::State, Extension, Json};
use tracing::info;

use crate::{
    adapters::dto::user_dto::{MeResponse, UpdateProfileRequest},
    application::{
        dto::user_dto::UserDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::session::Session,
};

pub struct UserController;

impl UserController {
    /// GET /api/me
    pub async fn get_me(
        State(user_repo): State<Arc<dyn UserRepository>>,
        Extension(session): Extension<Session>,
    ) -> Result<Json<MeResponse>, ApplicationError> {
        let user = user_repo.ensure_user(UserDTO::from(session.user)).await?;
        Ok(Json(MeResponse { user }))
    }

    /// PATCH /api/me
    /// Body: {"name"?, "image"?}
    pub async fn update_me(
        State(user_repo): State<Arc<dyn UserRepository>>,
        Extension(session): Extension<Session>,
        Json(body): Json<UpdateProfileRequest>,
    ) -> Result<Json<MeResponse>, ApplicationError> {
        let mut user_dto = UserDTO::for_update(session.user_id());
        user_dto.name = body.name;
        user_dto.image = body.image;

        if !user_dto.has_changes() {
            return Err(ApplicationError::BadRequest(
                "Nothing to update".to_string(),
            ));
        }

        // The profile row may not exist yet for token-based sessions.
        user_repo.ensure_user(UserDTO::from(session.user.clone())).await?;
        let user = user_repo.update_user(user_dto).await?;
        info!("Profile updated for user {}", user.id);

        Ok(Json(MeResponse { user }))
    }
}
