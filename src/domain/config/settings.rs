use std::{path::PathBuf, time::Duration};

use serde::Serialize;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024 * 1024;
pub const DEFAULT_DATABASE_PATH: &str = "storage/files.db";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GPLINKS_BASE_URL: &str = "https://gplinks.co/api/v1";

pub const DEFAULT_ALLOWED_FILE_TYPES: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "txt", "rtf", "odt",
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg",
    // videos
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm",
    // audio
    "mp3", "wav", "flac", "aac", "ogg", "wma",
    // archives
    "zip", "rar", "7z", "tar", "gz",
    // applications
    "exe", "msi", "deb", "rpm", "dmg", "pkg",
    // data
    "json", "xml", "csv", "xlsx", "xls", "ppt", "pptx",
];

/// Non-secret runtime settings, built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    #[serde(rename = "storageChannelId")]
    pub storage_channel_id: String,
    #[serde(rename = "botUsername")]
    pub bot_username: Option<String>,
    #[serde(rename = "databasePath")]
    pub database_path: PathBuf,
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,
    #[serde(rename = "allowedFileTypes")]
    pub allowed_file_types: Vec<String>,
    #[serde(skip)]
    pub admin_user_ids: Vec<i64>,
    #[serde(skip)]
    pub http_timeout: Duration,
    pub port: Option<u16>,
    /// Empty means any origin may call the status server.
    #[serde(rename = "corsAllowedOrigins")]
    pub cors_allowed_origins: Vec<String>,
    #[serde(rename = "geminiModel")]
    pub gemini_model: String,
    #[serde(rename = "gplinksBaseUrl")]
    pub gplinks_base_url: String,
}

impl Settings {
    /// An empty allow-list accepts every extension.
    pub fn allows_extension(&self, extension: &str) -> bool {
        if self.allowed_file_types.is_empty() {
            return true;
        }
        let extension = extension.to_lowercase();
        self.allowed_file_types.iter().any(|t| *t == extension)
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_user_ids.contains(&user_id)
    }

    pub fn default_allowed_file_types() -> Vec<String> {
        DEFAULT_ALLOWED_FILE_TYPES
            .iter()
            .map(|t| t.to_string())
            .collect()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_channel_id: String::new(),
            bot_username: None,
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: Self::default_allowed_file_types(),
            admin_user_ids: Vec::new(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            port: None,
            cors_allowed_origins: Vec::new(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gplinks_base_url: DEFAULT_GPLINKS_BASE_URL.to_string(),
        }
    }
}
