pub mod session;
pub mod storage_key;
pub mod stored_file;
pub mod user;
