use thiserror::Error;

use crate::application::error::ApplicationError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("{0} is not configured")]
    Disabled(&'static str),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ServiceError> for ApplicationError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(_) => ApplicationError::NotFound,
            ServiceError::InternalError(msg) => ApplicationError::InternalError(msg),
            other => ApplicationError::ExternalService(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            ServiceError::NetworkError("Request timeout".to_string())
        } else if error.is_connect() {
            ServiceError::NetworkError(format!("Connection failed: {}", error))
        } else if let Some(status) = error.status() {
            match status.as_u16() {
                404 => ServiceError::NotFound(error.to_string()),
                401 | 403 => ServiceError::Unauthorized(error.to_string()),
                _ => ServiceError::ProviderError(error.to_string()),
            }
        } else {
            ServiceError::InternalError(error.to_string())
        }
    }
}

impl From<teloxide::RequestError> for ServiceError {
    fn from(error: teloxide::RequestError) -> Self {
        use teloxide::{ApiError, RequestError};

        match error {
            RequestError::Api(ApiError::MessageToForwardNotFound)
            | RequestError::Api(ApiError::MessageIdInvalid)
            | RequestError::Api(ApiError::ChatNotFound) => ServiceError::NotFound(error.to_string()),
            RequestError::Api(ApiError::BotBlocked)
            | RequestError::Api(ApiError::NotEnoughRightsToPostMessages)
            | RequestError::Api(ApiError::InvalidToken) => {
                ServiceError::Unauthorized(error.to_string())
            }
            RequestError::Network(e) => ServiceError::NetworkError(e.to_string()),
            RequestError::RetryAfter(secs) => {
                ServiceError::ProviderError(format!("Rate limited, retry after {:?}", secs))
            }
            other => ServiceError::ProviderError(other.to_string()),
        }
    }
}

impl From<teloxide::DownloadError> for ServiceError {
    fn from(error: teloxide::DownloadError) -> Self {
        match error {
            teloxide::DownloadError::Network(e) => ServiceError::NetworkError(e.to_string()),
            other => ServiceError::InternalError(other.to_string()),
        }
    }
}
