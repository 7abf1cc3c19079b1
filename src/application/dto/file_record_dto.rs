use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{
    file::FileKind,
    file_record::{ChannelMessageRef, FileRecord},
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileRecordDTO {
    #[serde(default)]
    pub file_id: String,
    pub filename: Option<String>,
    pub file_size: Option<u64>,
    pub file_type: Option<String>,
    pub mime_type: Option<String>,
    pub channel_id: Option<i64>,
    pub message_id: Option<i32>,
    pub user_id: Option<i64>,
    pub download_count: Option<u64>,
    pub is_private: Option<bool>,
    pub is_deleted: Option<bool>,
    pub google_drive_link: Option<String>,
    pub upload_date: Option<DateTime<Utc>>,
}

impl From<FileRecord> for FileRecordDTO {
    fn from(value: FileRecord) -> Self {
        FileRecordDTO {
            file_id: value.file_id,
            filename: Some(value.filename),
            file_size: Some(value.file_size),
            file_type: Some(value.file_type.as_str().to_string()),
            mime_type: value.mime_type,
            channel_id: Some(value.message.channel_id),
            message_id: Some(value.message.message_id),
            user_id: value.user_id,
            download_count: Some(value.download_count),
            is_private: Some(value.is_private),
            is_deleted: Some(value.is_deleted),
            google_drive_link: value.google_drive_link,
            upload_date: Some(value.upload_date),
        }
    }
}

impl From<FileRecordDTO> for FileRecord {
    fn from(value: FileRecordDTO) -> Self {
        FileRecord {
            file_id: value.file_id,
            filename: value.filename.unwrap_or_default(),
            file_size: value.file_size.unwrap_or(0),
            file_type: value
                .file_type
                .and_then(|t| t.parse().ok())
                .unwrap_or(FileKind::Document),
            mime_type: value.mime_type,
            message: ChannelMessageRef {
                channel_id: value.channel_id.unwrap_or(0),
                message_id: value.message_id.unwrap_or(0),
            },
            user_id: value.user_id,
            download_count: value.download_count.unwrap_or(0),
            is_private: value.is_private.unwrap_or(false),
            is_deleted: value.is_deleted.unwrap_or(false),
            google_drive_link: value.google_drive_link,
            upload_date: value.upload_date.unwrap_or_else(Utc::now),
        }
    }
}
