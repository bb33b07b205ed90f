pub mod avatar_controller;
pub mod file_controller;
pub mod health_controller;
pub mod upload_controller;
pub mod user_controller;
