pub mod file_dto;
pub mod stored_file_dto;
pub mod upload_dto;
pub mod user_dto;
