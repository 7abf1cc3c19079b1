use axum::extract::FromRef;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    application::{
        repositories::user_repository::UserRepository,
        services::{
            chat_assistant::ChatAssistant, file_service::FileService, link_service::LinkService,
        },
    },
    domain::config::settings::Settings,
};

/// Which optional vendor integrations were configured at startup.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Integrations {
    pub ai: bool,
    #[serde(rename = "urlShortener")]
    pub url_shortener: bool,
    #[serde(rename = "googleDrive")]
    pub google_drive: bool,
}

#[derive(Clone, FromRef)]
pub struct AppState {
    pub bot_username: String,
    pub settings: Arc<Settings>,
    pub integrations: Integrations,
    pub file_service: Arc<FileService>,
    pub link_service: Arc<LinkService>,
    pub chat_assistant: Arc<ChatAssistant>,
    pub user_repository: Arc<dyn UserRepository>,
}
