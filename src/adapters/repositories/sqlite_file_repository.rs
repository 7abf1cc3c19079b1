use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{query, query_as, SqlitePool};

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO, error::ApplicationError,
        repositories::file_repository::FileRepository,
    },
    domain::models::file_record::{FileRecord, FileStats},
};

pub struct SqliteFileRepository {
    pool: SqlitePool,
}

impl SqliteFileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRepository for SqliteFileRepository {
    async fn create_file(&self, file: FileRecordDTO) -> Result<FileRecord, ApplicationError> {
        let mut file = file;
        file.sanitize();

        let query = r#"
            INSERT INTO files (
                file_id, filename, file_size, file_type, mime_type,
                message_id, channel_id, user_id, upload_date,
                download_count, google_drive_link, is_private, is_deleted
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let new_file: FileRecord = file.into();

        let created: FileRecordDTO = query_as::<_, FileRecordDTO>(query)
            .bind(&new_file.file_id)
            .bind(&new_file.filename)
            .bind(new_file.file_size as i64)
            .bind(new_file.file_type.as_str())
            .bind(&new_file.mime_type)
            .bind(new_file.message.message_id)
            .bind(new_file.message.channel_id)
            .bind(new_file.user_id)
            .bind(new_file.upload_date)
            .bind(new_file.download_count as i64)
            .bind(&new_file.google_drive_link)
            .bind(new_file.is_private)
            .bind(new_file.is_deleted)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(created.into())
    }

    async fn get_active_file(&self, file_id: &str) -> Result<Option<FileRecord>, ApplicationError> {
        let query = "SELECT * FROM files WHERE file_id = ? AND is_deleted = 0";

        let fetched: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(fetched.map(|dto| dto.into()))
    }

    async fn file_id_exists(&self, file_id: &str) -> Result<bool, ApplicationError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM files WHERE file_id = ?)")
                .bind(file_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(exists)
    }

    async fn increment_download_count(
        &self,
        file_id: &str,
    ) -> Result<Option<FileRecord>, ApplicationError> {
        let query = r#"
            UPDATE files
            SET download_count = download_count + 1
            WHERE file_id = ? AND is_deleted = 0
            RETURNING *
        "#;

        let updated: Option<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(updated.map(|dto| dto.into()))
    }

    async fn set_drive_link(&self, file_id: &str, link: &str) -> Result<(), ApplicationError> {
        query("UPDATE files SET google_drive_link = ? WHERE file_id = ?")
            .bind(link)
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn soft_delete(&self, file_id: &str) -> Result<bool, ApplicationError> {
        let result = query("UPDATE files SET is_deleted = 1 WHERE file_id = ? AND is_deleted = 0")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_user_files(
        &self,
        user_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<FileRecord>, ApplicationError> {
        let query = r#"
            SELECT * FROM files
            WHERE user_id = ? AND is_deleted = 0
            ORDER BY upload_date DESC, id DESC
            LIMIT ? OFFSET ?
        "#;

        let rows: Vec<FileRecordDTO> = query_as::<_, FileRecordDTO>(query)
            .bind(user_id)
            .bind(limit as i64)
            .bind(offset as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }

    async fn get_file_stats(&self) -> Result<FileStats, ApplicationError> {
        let (total_files, total_size): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(file_size), 0) FROM files WHERE is_deleted = 0",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT file_type, COUNT(*) FROM files WHERE is_deleted = 0 GROUP BY file_type",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        let file_types: BTreeMap<String, u64> = rows
            .into_iter()
            .map(|(file_type, count)| (file_type, count as u64))
            .collect();

        Ok(FileStats {
            total_files: total_files as u64,
            total_size: total_size as u64,
            file_types,
        })
    }
}
