pub mod access_guard;
pub mod session_resolver;
pub mod storage_service;

pub use access_guard::AccessGuard;
pub use session_resolver::SessionResolver;
pub use storage_service::StorageService;
