use async_trait::async_trait;

use crate::services::ServiceError;

#[async_trait]
pub trait LinkShortener: Send + Sync {
    fn is_enabled(&self) -> bool;
    /// Returns the full short URL issued by the provider.
    async fn shorten(&self, url: &str, alias: Option<&str>) -> Result<String, ServiceError>;
}
