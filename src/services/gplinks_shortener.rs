use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::{application::services::link_shortener::LinkShortener, services::error::ServiceError};

const GPLINKS_DOMAIN: &str = "gplinks.com";

#[derive(Debug, Serialize)]
struct ShortenRequest<'a> {
    url: &'a str,
    domain: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    alias: Option<&'a str>,
}

/// GPLinks has answered with several field names over time.
#[derive(Debug, Deserialize)]
struct ShortenResponse {
    #[serde(rename = "shortenedUrl")]
    shortened_url: Option<String>,
    short_url: Option<String>,
    url: Option<String>,
}

impl ShortenResponse {
    fn into_short_url(self) -> Option<String> {
        self.shortened_url
            .or(self.short_url)
            .or(self.url)
            .filter(|u| !u.trim().is_empty())
    }
}

pub struct GplinksShortener {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GplinksShortener {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl LinkShortener for GplinksShortener {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn shorten(&self, url: &str, alias: Option<&str>) -> Result<String, ServiceError> {
        let endpoint = format!("{}/shorten", self.base_url);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&ShortenRequest {
                url,
                domain: GPLINKS_DOMAIN,
                alias,
            })
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED => {
                return Err(ServiceError::Unauthorized("invalid GPLinks API key".to_string()));
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let error_text = response.text().await.unwrap_or_default();
                return Err(ServiceError::ProviderError(format!(
                    "GPLinks rejected the request: {}",
                    error_text
                )));
            }
            status => {
                return Err(ServiceError::ProviderError(format!(
                    "GPLinks API error: {}",
                    status
                )));
            }
        }

        let parsed: ShortenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::ProviderError(e.to_string()))?;

        parsed
            .into_short_url()
            .ok_or_else(|| ServiceError::ProviderError("GPLinks returned no short URL".to_string()))
    }
}
