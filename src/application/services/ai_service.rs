use async_trait::async_trait;

use crate::services::ServiceError;

#[async_trait]
pub trait AiService: Send + Sync {
    fn is_enabled(&self) -> bool;
    async fn generate(&self, prompt: &str) -> Result<String, ServiceError>;
}
