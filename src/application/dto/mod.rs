pub mod stored_file_dto;
pub mod user_dto;
