use async_trait::async_trait;

use crate::{
    application::{dto::file_record_dto::FileRecordDTO, error::ApplicationError},
    domain::models::file_record::{FileRecord, FileStats},
};

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create_file(&self, file: FileRecordDTO) -> Result<FileRecord, ApplicationError>;
    /// Soft-deleted rows are never returned.
    async fn get_active_file(&self, file_id: &str) -> Result<Option<FileRecord>, ApplicationError>;
    /// Includes soft-deleted rows, so identifiers are never reused.
    async fn file_id_exists(&self, file_id: &str) -> Result<bool, ApplicationError>;
    async fn increment_download_count(
        &self,
        file_id: &str,
    ) -> Result<Option<FileRecord>, ApplicationError>;
    async fn set_drive_link(&self, file_id: &str, link: &str) -> Result<(), ApplicationError>;
    async fn soft_delete(&self, file_id: &str) -> Result<bool, ApplicationError>;
    async fn list_user_files(
        &self,
        user_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<FileRecord>, ApplicationError>;
    async fn get_file_stats(&self) -> Result<FileStats, ApplicationError>;
}
