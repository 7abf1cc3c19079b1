use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

use crate::{application::error::ApplicationError, domain::models::file::format_file_size};

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApplicationError::NotFound => {
                warn!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }
            ApplicationError::Validation(ref msg) => {
                warn!("Bad request: {}", msg);
                (StatusCode::BAD_REQUEST, "Bad request".to_string())
            }
            ApplicationError::Unauthorized => {
                warn!("Unauthorized access attempt");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            ApplicationError::PayloadTooLarge { size, max } => {
                warn!("File too large: {} > {}", size, max);
                (StatusCode::PAYLOAD_TOO_LARGE, "File too large".to_string())
            }
            ApplicationError::ExternalService(ref msg) | ApplicationError::StorageRelay(ref msg) => {
                error!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "Upstream service error".to_string())
            }
            ApplicationError::InternalError(ref msg) => {
                error!("Internal server error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApplicationError::DatabaseError(ref msg) => {
                error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl ApplicationError {
    /// Text shown to a chat user. Internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ApplicationError::Validation(msg) => format!("❌ {}", capitalize(msg)),
            ApplicationError::PayloadTooLarge { size, max } => format!(
                "❌ File too large: {} (maximum {})",
                format_file_size(*size),
                format_file_size(*max)
            ),
            ApplicationError::NotFound => "❌ File not found or has been deleted.".to_string(),
            ApplicationError::Unauthorized => {
                "🔒 You don't have permission to access this file.".to_string()
            }
            ApplicationError::ExternalService(msg) => {
                format!("⚠️ External service unavailable: {}", msg)
            }
            ApplicationError::StorageRelay(_) => {
                "❌ Could not reach file storage, please try again later.".to_string()
            }
            ApplicationError::DatabaseError(_) | ApplicationError::InternalError(_) => {
                "❌ Something went wrong, please try again later.".to_string()
            }
        }
    }

    /// Logs at a level matching who caused the failure.
    pub fn log(&self, context: &str) {
        if self.is_client_error() {
            warn!("{}: {}", context, self);
        } else {
            error!("{}: {}", context, self);
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
