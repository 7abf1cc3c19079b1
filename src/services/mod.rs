mod disabled;
mod error;
mod gemini_ai;
mod google_drive;
mod gplinks_shortener;
mod telegram_channel;

pub use disabled::{DisabledAiService, DisabledDriveService, DisabledLinkShortener};
pub use error::ServiceError;
pub use gemini_ai::GeminiAiService;
pub use google_drive::GoogleDriveService;
pub use gplinks_shortener::GplinksShortener;
pub use telegram_channel::TelegramStorageChannel;

use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tracing::{info, warn};

use crate::{
    application::services::{
        ai_service::AiService, drive_service::DriveService, link_shortener::LinkShortener,
    },
    domain::config::{secrets::Secrets, settings::Settings},
};

pub fn create_http_client(timeout: Duration) -> Result<Client, ServiceError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ServiceError::InternalError(e.to_string()))
}

pub fn create_ai_service(client: &Client, settings: &Settings, secrets: &Secrets) -> Arc<dyn AiService> {
    match &secrets.gemini_api_key {
        Some(api_key) => {
            info!("AI assistant enabled with model {}", settings.gemini_model);
            Arc::new(GeminiAiService::new(
                client.clone(),
                api_key.clone(),
                settings.gemini_model.clone(),
            ))
        }
        None => {
            info!("GEMINI_API_KEY not set, AI assistant disabled");
            Arc::new(DisabledAiService)
        }
    }
}

pub fn create_link_shortener(
    client: &Client,
    settings: &Settings,
    secrets: &Secrets,
) -> Arc<dyn LinkShortener> {
    match &secrets.gplinks_api_key {
        Some(api_key) => {
            info!("URL shortening enabled via {}", settings.gplinks_base_url);
            Arc::new(GplinksShortener::new(
                client.clone(),
                api_key.clone(),
                settings.gplinks_base_url.clone(),
            ))
        }
        None => {
            info!("GPLINKS_API_KEY not set, URL shortening disabled");
            Arc::new(DisabledLinkShortener)
        }
    }
}

/// Broken Drive credentials disable the copy instead of stopping the bot.
pub fn create_drive_service(client: &Client, secrets: &Secrets) -> Arc<dyn DriveService> {
    let Some(gdrive_secrets) = secrets.gdrive_secrets.as_ref() else {
        info!("Google Drive credentials not set, Drive copies disabled");
        return Arc::new(DisabledDriveService);
    };

    match GoogleDriveService::new(client.clone(), gdrive_secrets.clone()) {
        Ok(service) => {
            info!("Google Drive copies enabled");
            Arc::new(service)
        }
        Err(e) => {
            warn!("Google Drive disabled: {}", e);
            Arc::new(DisabledDriveService)
        }
    }
}
