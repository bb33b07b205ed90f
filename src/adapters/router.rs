use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::adapters::{
    controllers::{
        avatar_controller::AvatarController, file_controller::FileController, health_controller::HealthController,
        upload_controller::UploadController, user_controller::UserController,
    },
    middleware::require_session,
    state::AppState,
};

/// Builds the HTTP surface. CORS is layered on by the caller.
pub fn create_app(app_state: AppState) -> Router {
    // Every route here answers 401 before reaching its handler when the
    // caller has no session.
    let protected_routes = Router::new()
        .route(
            "/api/upload",
            post(UploadController::create_presigned_upload),
        )
        .route(
            "/api/files",
            get(FileController::list_files).post(FileController::create_file),
        )
        .route(
            "/api/files/{*key}",
            get(FileController::download_file).delete(FileController::delete_file),
        )
        .route(
            "/api/me",
            get(UserController::get_me).patch(UserController::update_me),
        )
        .route(
            "/api/me/avatar",
            post(AvatarController::create_avatar_upload).delete(AvatarController::delete_avatar),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    let public_routes = Router::new()
        .route("/api/health", get(HealthController::health_check))
        .route(
            "/api/avatars/{*path}",
            get(AvatarController::download_avatar),
        );

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
