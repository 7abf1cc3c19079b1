pub mod secrets;
pub mod settings;

use std::{path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use secrets::{GDriveCredentials, GDriveSecrets, Secrets};
use settings::{Settings, DEFAULT_DATABASE_PATH, DEFAULT_GEMINI_MODEL, DEFAULT_GPLINKS_BASE_URL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

pub fn load_from_env() -> Result<(Settings, Secrets), ConfigError> {
    load(|key| std::env::var(key).ok())
}

/// Builds settings and secrets from a key lookup. Blank values count as unset.
pub fn load<F>(lookup: F) -> Result<(Settings, Secrets), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let bot_token = get("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;
    let storage_channel_id =
        get("STORAGE_CHANNEL_ID").ok_or(ConfigError::Missing("STORAGE_CHANNEL_ID"))?;

    let defaults = Settings::default();

    let max_file_size = match get("MAX_FILE_SIZE") {
        Some(raw) => parse_value::<u64>("MAX_FILE_SIZE", &raw)?,
        None => defaults.max_file_size,
    };

    let allowed_file_types = match get("ALLOWED_FILE_TYPES") {
        Some(raw) => raw
            .split(',')
            .map(|t| t.trim().trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect(),
        None => Settings::default_allowed_file_types(),
    };

    let admin_user_ids = match get("ADMIN_USER_IDS") {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| parse_value::<i64>("ADMIN_USER_IDS", id))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let http_timeout = match get("HTTP_TIMEOUT_SECS") {
        Some(raw) => Duration::from_secs(parse_value::<u64>("HTTP_TIMEOUT_SECS", &raw)?),
        None => defaults.http_timeout,
    };

    let port = get("PORT")
        .map(|raw| parse_value::<u16>("PORT", &raw))
        .transpose()?;

    let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let settings = Settings {
        storage_channel_id,
        bot_username: get("BOT_USERNAME").map(|u| u.trim_start_matches('@').to_string()),
        database_path: PathBuf::from(
            get("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
        ),
        max_file_size,
        allowed_file_types,
        admin_user_ids,
        http_timeout,
        port,
        cors_allowed_origins,
        gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        gplinks_base_url: get("GPLINKS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GPLINKS_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string(),
    };

    let secrets = Secrets {
        bot_token,
        gemini_api_key: get("GEMINI_API_KEY"),
        gplinks_api_key: get("GPLINKS_API_KEY"),
        gdrive_secrets: drive_secrets(&get),
    };

    Ok((settings, secrets))
}

fn drive_secrets<G>(get: &G) -> Option<GDriveSecrets>
where
    G: Fn(&str) -> Option<String>,
{
    let folder_id = get("GOOGLE_DRIVE_FOLDER_ID");

    if let Some(json) = get("GOOGLE_DRIVE_CREDENTIALS") {
        return Some(GDriveSecrets {
            folder_id,
            credentials: GDriveCredentials::ServiceAccount(json),
        });
    }

    match (
        get("GOOGLE_DRIVE_CLIENT_ID"),
        get("GOOGLE_DRIVE_CLIENT_SECRET"),
        get("GOOGLE_DRIVE_REFRESH_TOKEN"),
    ) {
        (Some(client_id), Some(client_secret), Some(refresh_token)) => Some(GDriveSecrets {
            folder_id,
            credentials: GDriveCredentials::OAuthClient {
                client_id,
                client_secret,
                refresh_token,
            },
        }),
        (Some(_), Some(_), None) => {
            tracing::warn!(
                "GOOGLE_DRIVE_CLIENT_ID/SECRET set without GOOGLE_DRIVE_REFRESH_TOKEN, Drive copies disabled"
            );
            None
        }
        _ => None,
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
