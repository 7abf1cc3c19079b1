use async_trait::async_trait;

use crate::{
    application::{dto::short_url_dto::ShortUrlDTO, error::ApplicationError},
    domain::models::short_url::ShortUrlRecord,
};

#[async_trait]
pub trait ShortUrlRepository: Send + Sync {
    async fn create_short_url(&self, url: ShortUrlDTO) -> Result<ShortUrlRecord, ApplicationError>;
    async fn get_by_code(&self, short_code: &str)
        -> Result<Option<ShortUrlRecord>, ApplicationError>;
    async fn list_for_file(&self, file_id: &str) -> Result<Vec<ShortUrlRecord>, ApplicationError>;
}
