use async_trait::async_trait;

use crate::{domain::models::file::FileData, services::ServiceError};

#[async_trait]
pub trait DriveService: Send + Sync {
    fn is_enabled(&self) -> bool;
    /// Whether a file of this size should be copied at all.
    fn accepts(&self, size: u64) -> bool;
    /// Uploads a copy and returns a shareable link.
    async fn upload(&self, file_data: FileData) -> Result<String, ServiceError>;
}
