use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("File of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("Resource not found")]
    NotFound,

    #[error("Requester is not allowed to access this resource")]
    Unauthorized,

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Storage channel error: {0}")]
    StorageRelay(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// Errors caused by the request itself rather than by the bot or a vendor.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApplicationError::Validation(_)
                | ApplicationError::PayloadTooLarge { .. }
                | ApplicationError::NotFound
                | ApplicationError::Unauthorized
        )
    }
}
