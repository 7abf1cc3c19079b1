/// How the Drive integration obtains access tokens.
#[derive(Clone)]
pub enum GDriveCredentials {
    /// Installed-app OAuth2 client exchanging a long-lived refresh token.
    OAuthClient {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    /// Service-account key JSON, exchanged through a signed JWT grant.
    ServiceAccount(String),
}

#[derive(Clone)]
pub struct GDriveSecrets {
    pub folder_id: Option<String>,
    pub credentials: GDriveCredentials,
}

#[derive(Clone)]
pub struct Secrets {
    pub bot_token: String,
    pub gemini_api_key: Option<String>,
    pub gplinks_api_key: Option<String>,
    pub gdrive_secrets: Option<GDriveSecrets>,
}
