use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::application::dto::file_record_dto::FileRecordDTO;

impl FromRow<'_, SqliteRow> for FileRecordDTO {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let file_size: i64 = row.try_get("file_size")?;
        let download_count: i64 = row.try_get("download_count")?;

        Ok(FileRecordDTO {
            file_id: row.try_get("file_id")?,
            filename: Some(row.try_get("filename")?),
            file_size: Some(file_size.max(0) as u64),
            file_type: Some(row.try_get("file_type")?),
            mime_type: row.try_get("mime_type")?,
            channel_id: Some(row.try_get("channel_id")?),
            message_id: Some(row.try_get("message_id")?),
            user_id: row.try_get("user_id")?,
            download_count: Some(download_count.max(0) as u64),
            is_private: Some(row.try_get("is_private")?),
            is_deleted: Some(row.try_get("is_deleted")?),
            google_drive_link: row.try_get("google_drive_link")?,
            upload_date: Some(row.try_get("upload_date")?),
        })
    }
}

impl FileRecordDTO {
    pub fn sanitize(&mut self) {
        if let Some(file_size) = self.file_size {
            self.file_size = Some(std::cmp::min(file_size, i64::MAX as u64));
        }
        if let Some(download_count) = self.download_count {
            self.download_count = Some(std::cmp::min(download_count, i64::MAX as u64));
        }
        if let Some(filename) = &self.filename {
            self.filename = Some(filename.trim().to_string());
        }
    }
}
