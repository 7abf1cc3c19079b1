use std::sync::Arc;

use chrono::Utc;
use reqwest::Url;
use tracing::{error, info, warn};

use crate::{
    application::{
        dto::short_url_dto::ShortUrlDTO,
        error::ApplicationError,
        repositories::short_url_repository::ShortUrlRepository,
        services::{file_service::FileService, link_shortener::LinkShortener},
    },
    domain::models::short_url::ShortUrlRecord,
};

const MAX_ALIAS_LEN: usize = 30;

pub struct LinkService {
    shortener: Arc<dyn LinkShortener>,
    repo: Arc<dyn ShortUrlRepository>,
    files: Arc<FileService>,
}

impl LinkService {
    pub fn new(
        shortener: Arc<dyn LinkShortener>,
        repo: Arc<dyn ShortUrlRepository>,
        files: Arc<FileService>,
    ) -> Self {
        Self {
            shortener,
            repo,
            files,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.shortener.is_enabled()
    }

    /// Adds `https://` to bare hosts and rejects anything that is not an
    /// absolute http(s) URL with a host.
    pub fn normalize_url(raw: &str) -> Result<String, ApplicationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ApplicationError::Validation("URL is empty".to_string()));
        }

        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate)
            .map_err(|e| ApplicationError::Validation(format!("invalid URL '{}': {}", trimmed, e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApplicationError::Validation(format!(
                "unsupported URL scheme '{}'",
                url.scheme()
            )));
        }
        match url.host_str() {
            Some(host) if host.contains('.') || host == "localhost" => Ok(url.to_string()),
            _ => Err(ApplicationError::Validation(format!(
                "URL '{}' has no valid host",
                trimmed
            ))),
        }
    }

    pub async fn shorten(
        &self,
        url: &str,
        alias: Option<&str>,
        user_id: Option<i64>,
        file_id: Option<&str>,
    ) -> Result<ShortUrlRecord, ApplicationError> {
        let original_url = Self::normalize_url(url)?;
        if let Some(alias) = alias {
            validate_alias(alias)?;
        }

        let short_url = self
            .shortener
            .shorten(&original_url, alias)
            .await
            .map_err(|e| {
                error!("Shortening {} failed: {}", original_url, e);
                ApplicationError::from(e)
            })?;

        let short_code = short_code_of(&short_url);
        if let Some(existing) = self.repo.get_by_code(&short_code).await? {
            if existing.original_url == original_url {
                return Ok(existing);
            }
            warn!(
                "Shortener reissued code {} for a different URL ({} vs {})",
                short_code, existing.original_url, original_url
            );
            return Err(ApplicationError::ExternalService(format!(
                "short code '{}' is already taken",
                short_code
            )));
        }

        let record = self
            .repo
            .create_short_url(ShortUrlDTO {
                short_code,
                short_url: Some(short_url),
                original_url: Some(original_url),
                alias: alias.map(str::to_string),
                user_id,
                file_id: file_id.map(str::to_string),
                created_date: Some(Utc::now()),
            })
            .await?;

        info!("Created short link {} -> {}", record.short_url, record.original_url);
        Ok(record)
    }

    /// Shortens the deep link of a stored file and links the two records.
    pub async fn share_file(
        &self,
        file_id: &str,
        requester: i64,
    ) -> Result<ShortUrlRecord, ApplicationError> {
        let record = self.files.get_file(file_id, requester).await?;
        let link = self.files.retrieval_link(&record.file_id);
        self.shorten(&link, None, Some(requester), Some(&record.file_id))
            .await
    }

    pub async fn resolve(&self, code: &str) -> Result<ShortUrlRecord, ApplicationError> {
        let code = short_code_of(code.trim());
        self.repo
            .get_by_code(&code)
            .await?
            .ok_or(ApplicationError::NotFound)
    }

    pub async fn links_for_file(&self, file_id: &str) -> Result<Vec<ShortUrlRecord>, ApplicationError> {
        self.repo.list_for_file(file_id).await
    }
}

fn validate_alias(alias: &str) -> Result<(), ApplicationError> {
    let valid = !alias.is_empty()
        && alias.len() <= MAX_ALIAS_LEN
        && alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ApplicationError::Validation(format!(
            "alias must be 1-{} letters, digits, '-' or '_'",
            MAX_ALIAS_LEN
        )))
    }
}

/// Last path segment of a short URL, or the input itself when it has none.
fn short_code_of(short_url: &str) -> String {
    let trimmed = short_url.trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        Err(_) => trimmed.to_string(),
    }
}
