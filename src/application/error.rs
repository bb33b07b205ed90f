#[derive(Debug)]
pub enum ApplicationError {
    NotFound,
    InternalError(String),
    PersistenceError(String),
    StorageError(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized,
    Forbidden,
}
