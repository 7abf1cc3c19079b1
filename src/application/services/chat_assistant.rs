use std::sync::Arc;

use tracing::warn;

use crate::{
    application::{
        dto::ai_interaction_dto::AiInteractionDTO,
        error::ApplicationError,
        repositories::ai_interaction_repository::AiInteractionRepository,
        services::{ai_service::AiService, file_service::FileService},
    },
    domain::models::{
        ai_interaction::InteractionKind,
        file::{file_extension, format_file_size, FileKind},
        file_record::FileRecord,
    },
    services::ServiceError,
};

pub const DEGRADED_REPLY: &str =
    "🤖 The AI assistant is unavailable right now. Uploads and downloads keep working, please try again later.";
pub const DISABLED_REPLY: &str = "🤖 The AI assistant is not configured on this bot.";
pub const EMPTY_REPLY: &str = "Sorry, I couldn't process your request.";

const UPLOAD_NOTE_LIMIT: usize = 200;

/// Forwards user questions to the AI service. Never fails: every error
/// becomes a degraded reply. Answered questions are logged per user.
pub struct ChatAssistant {
    ai: Arc<dyn AiService>,
    files: Arc<FileService>,
    interactions: Arc<dyn AiInteractionRepository>,
}

impl ChatAssistant {
    pub fn new(
        ai: Arc<dyn AiService>,
        files: Arc<FileService>,
        interactions: Arc<dyn AiInteractionRepository>,
    ) -> Self {
        Self {
            ai,
            files,
            interactions,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ai.is_enabled()
    }

    pub async fn ask(&self, question: &str, file_id: Option<&str>, requester: i64) -> String {
        let record = match file_id {
            Some(file_id) => match self.files.get_file(file_id, requester).await {
                Ok(record) => Some(record),
                Err(ApplicationError::NotFound) => {
                    return format!("❌ No file found with ID: {}", file_id);
                }
                Err(ApplicationError::Unauthorized) => {
                    return "🔒 That file is private.".to_string();
                }
                Err(e) => {
                    warn!("Could not load context file {}: {}", file_id, e);
                    None
                }
            },
            None => None,
        };

        let kind = if record.is_some() {
            InteractionKind::FileAnalysis
        } else {
            InteractionKind::General
        };

        let prompt = build_prompt(question, record.as_ref());
        match self.ai.generate(&prompt).await {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY.to_string(),
            Ok(text) => {
                self.log_interaction(requester, question, &text, kind).await;
                text
            }
            Err(ServiceError::Disabled(_)) => DISABLED_REPLY.to_string(),
            Err(e) => {
                warn!("AI request from user {} failed: {}", requester, e);
                DEGRADED_REPLY.to_string()
            }
        }
    }

    async fn log_interaction(&self, user_id: i64, query: &str, response: &str, kind: InteractionKind) {
        let interaction = AiInteractionDTO {
            user_id,
            query: Some(query.to_string()),
            response: Some(response.to_string()),
            interaction_type: Some(kind),
            created_date: None,
        };
        if let Err(e) = self.interactions.log_interaction(interaction).await {
            warn!("Could not log AI interaction of user {}: {}", user_id, e);
        }
    }

    /// Short note attached to upload replies for photos and documents.
    pub async fn describe_upload(&self, record: &FileRecord) -> Option<String> {
        if !matches!(record.file_type, FileKind::Photo | FileKind::Document) {
            return None;
        }

        let extension = file_extension(&record.filename);
        let prompt = format!(
            "This is a {} file named '{}' ({}). In two or three sentences, describe its likely \
             content and how to open or use it.",
            if extension.is_empty() { record.file_type.as_str() } else { &extension },
            record.filename,
            format_file_size(record.file_size)
        );

        match self.ai.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Some(truncate_text(text.trim(), UPLOAD_NOTE_LIMIT)),
            Ok(_) => None,
            Err(ServiceError::Disabled(_)) => None,
            Err(e) => {
                warn!("AI note for {} failed: {}", record.file_id, e);
                None
            }
        }
    }
}

fn build_prompt(question: &str, record: Option<&FileRecord>) -> String {
    match record {
        Some(record) => format!(
            "Context: the user stored a file named '{}' ({} {}, {}), uploaded {}, downloaded {} times.\n\nUser question: {}",
            record.filename,
            record.file_type,
            record.mime_type.as_deref().unwrap_or("unknown type"),
            format_file_size(record.file_size),
            record.upload_date.format("%Y-%m-%d"),
            record.download_count,
            question
        ),
        None => question.to_string(),
    }
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
