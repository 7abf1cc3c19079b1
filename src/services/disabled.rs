use async_trait::async_trait;

use crate::{
    application::services::{
        ai_service::AiService, drive_service::DriveService, link_shortener::LinkShortener,
    },
    domain::models::file::FileData,
    services::error::ServiceError,
};

/// Stand-ins used when an integration has no credentials configured.
pub struct DisabledAiService;

#[async_trait]
impl AiService for DisabledAiService {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Disabled("AI assistant"))
    }
}

pub struct DisabledLinkShortener;

#[async_trait]
impl LinkShortener for DisabledLinkShortener {
    fn is_enabled(&self) -> bool {
        false
    }

    async fn shorten(&self, _url: &str, _alias: Option<&str>) -> Result<String, ServiceError> {
        Err(ServiceError::Disabled("URL shortening"))
    }
}

pub struct DisabledDriveService;

#[async_trait]
impl DriveService for DisabledDriveService {
    fn is_enabled(&self) -> bool {
        false
    }

    fn accepts(&self, _size: u64) -> bool {
        false
    }

    async fn upload(&self, _file_data: FileData) -> Result<String, ServiceError> {
        Err(ServiceError::Disabled("Google Drive"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_integrations_report_themselves() {
        assert!(!DisabledAiService.is_enabled());
        assert!(!DisabledLinkShortener.is_enabled());
        assert!(!DisabledDriveService.is_enabled());
        assert!(!DisabledDriveService.accepts(0));

        let err = DisabledDriveService
            .upload(FileData::new(vec![1], "a.txt".to_string(), "text/plain".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Disabled("Google Drive")));
    }
}
