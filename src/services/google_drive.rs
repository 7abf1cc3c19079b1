use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    application::services::drive_service::DriveService,
    domain::{
        config::secrets::{GDriveCredentials, GDriveSecrets},
        models::file::FileData,
    },
    services::error::ServiceError,
};

const GOOGLE_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
const GOOGLE_UPLOAD_API_BASE: &str = "https://www.googleapis.com/upload/drive/v3";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

/// The Bot API only lets bots download files up to 20 MB, so larger
/// uploads cannot be copied.
pub const DRIVE_COPY_LIMIT: u64 = 20 * 1024 * 1024;

/// Refresh a little before Google's stated expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ServiceAccountCredentials {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

enum TokenSource {
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    ServiceAccount(ServiceAccountCredentials),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
    #[serde(rename = "webViewLink")]
    web_view_link: Option<String>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct GoogleDriveService {
    client: Client,
    api_base: String,
    upload_base: String,
    token_uri: String,
    folder_id: Option<String>,
    source: TokenSource,
    access_token: tokio::sync::Mutex<Option<CachedToken>>,
}

impl GoogleDriveService {
    pub fn new(client: Client, secrets: GDriveSecrets) -> Result<Self, ServiceError> {
        let source = match secrets.credentials {
            GDriveCredentials::OAuthClient {
                client_id,
                client_secret,
                refresh_token,
            } => TokenSource::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            },
            GDriveCredentials::ServiceAccount(json) => TokenSource::ServiceAccount(
                serde_json::from_str(&json)
                    .map_err(|e| ServiceError::InvalidCredentials(e.to_string()))?,
            ),
        };

        Ok(Self {
            client,
            api_base: GOOGLE_DRIVE_API_BASE.to_string(),
            upload_base: GOOGLE_UPLOAD_API_BASE.to_string(),
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            folder_id: secrets.folder_id,
            source,
            access_token: tokio::sync::Mutex::new(None),
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base: &str) -> Self {
        self.api_base = base.to_string();
        self.upload_base = format!("{}/upload", base);
        self.token_uri = format!("{}/token", base);
        self
    }

    async fn get_access_token(&self) -> Result<String, ServiceError> {
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let request = match &self.source {
            TokenSource::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => self.client.post(&self.token_uri).form(&[
                ("grant_type", "refresh_token"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ]),
            TokenSource::ServiceAccount(credentials) => {
                let jwt = create_jwt(credentials)?;
                self.client.post(&credentials.token_uri).form(&[
                    ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                    ("assertion", jwt.as_str()),
                ])
            }
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Unauthorized(format!(
                "token exchange failed ({}): {}",
                status, error_text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Unauthorized(e.to_string()))?;

        let lifetime = Duration::from_secs(token_response.expires_in)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token_response.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        debug!("Obtained Drive access token valid for {:?}", lifetime);

        Ok(token_response.access_token)
    }

    async fn share_with_link(&self, token: &str, file_id: &str) -> Result<(), ServiceError> {
        let url = format!("{}/files/{}/permissions", self.api_base, file_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServiceError::ProviderError(format!(
                "Sharing failed: {}",
                error_text
            )));
        }

        Ok(())
    }
}

fn create_jwt(credentials: &ServiceAccountCredentials) -> Result<String, ServiceError> {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims<'a> {
        iss: &'a str,
        scope: &'a str,
        aud: &'a str,
        exp: u64,
        iat: u64,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| ServiceError::InternalError(e.to_string()))?
        .as_secs();

    let claims = Claims {
        iss: &credentials.client_email,
        scope: DRIVE_SCOPE,
        aud: &credentials.token_uri,
        exp: now + 3600,
        iat: now,
    };

    let key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
        .map_err(|e| ServiceError::InvalidCredentials(e.to_string()))?;

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| ServiceError::InternalError(e.to_string()))
}

pub fn view_link(drive_file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{}/view", drive_file_id)
}

#[async_trait]
impl DriveService for GoogleDriveService {
    fn is_enabled(&self) -> bool {
        true
    }

    fn accepts(&self, size: u64) -> bool {
        size <= DRIVE_COPY_LIMIT
    }

    async fn upload(&self, file_data: FileData) -> Result<String, ServiceError> {
        let token = self.get_access_token().await?;

        let mut file_metadata = serde_json::json!({
            "name": file_data.filename,
            "mimeType": file_data.mime_type,
        });
        if let Some(folder_id) = &self.folder_id {
            file_metadata["parents"] = serde_json::json!([folder_id]);
        }

        let metadata_part = multipart::Part::text(file_metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let file_part = multipart::Part::bytes(file_data.content)
            .mime_str(&file_data.mime_type)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        let form = multipart::Form::new()
            .part("metadata", metadata_part)
            .part("file", file_part);

        let url = format!(
            "{}/files?uploadType=multipart&fields=id,webViewLink",
            self.upload_base
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ServiceError::ProviderError(format!(
                "Upload failed: {}",
                error_text
            )));
        }

        let drive_file: DriveFile = response
            .json()
            .await
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;

        // Best-effort: the copy and its link are kept when sharing fails.
        if let Err(e) = self.share_with_link(&token, &drive_file.id).await {
            warn!("Could not share Drive file {}: {}", drive_file.id, e);
        }

        Ok(drive_file
            .web_view_link
            .unwrap_or_else(|| view_link(&drive_file.id)))
    }
}
