use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::file::FileKind;

/// Where a stored file lives inside the storage channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessageRef {
    #[serde(rename = "channelId")]
    pub channel_id: i64,
    #[serde(rename = "messageId")]
    pub message_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: String,
    pub filename: String,
    pub file_size: u64,
    pub file_type: FileKind,
    pub mime_type: Option<String>,
    pub message: ChannelMessageRef,
    pub user_id: Option<i64>,
    pub download_count: u64,
    pub is_private: bool,
    pub is_deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_drive_link: Option<String>,
    pub upload_date: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == Some(user_id)
    }

    /// Public records are open to everyone; private ones only to the uploader or an admin.
    pub fn is_visible_to(&self, user_id: i64, is_admin: bool) -> bool {
        !self.is_private || is_admin || self.is_owned_by(user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileStats {
    #[serde(rename = "totalFiles")]
    pub total_files: u64,
    #[serde(rename = "totalSize")]
    pub total_size: u64,
    #[serde(rename = "fileTypes")]
    pub file_types: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_private: bool) -> FileRecord {
        FileRecord {
            file_id: "ID".to_string(),
            filename: "a.pdf".to_string(),
            file_size: 1,
            file_type: FileKind::Document,
            mime_type: None,
            message: ChannelMessageRef {
                channel_id: -100,
                message_id: 1,
            },
            user_id: Some(10),
            download_count: 0,
            is_private,
            is_deleted: false,
            google_drive_link: None,
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn private_records_are_restricted() {
        let private = record(true);
        assert!(private.is_visible_to(10, false));
        assert!(private.is_visible_to(99, true));
        assert!(!private.is_visible_to(99, false));

        let public = record(false);
        assert!(public.is_visible_to(99, false));
    }
}
