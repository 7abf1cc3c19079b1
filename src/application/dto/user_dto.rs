use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::user::UserStats;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserStatsDTO {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastActivity")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(rename = "totalUploads")]
    pub total_uploads: Option<u64>,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: Option<u64>,
    #[serde(rename = "storageUsed")]
    pub storage_used: Option<u64>,
}

impl From<UserStats> for UserStatsDTO {
    fn from(value: UserStats) -> Self {
        UserStatsDTO {
            user_id: value.user_id,
            username: value.username,
            first_name: value.first_name,
            last_activity: Some(value.last_activity),
            total_uploads: Some(value.total_uploads),
            total_downloads: Some(value.total_downloads),
            storage_used: Some(value.storage_used),
        }
    }
}

impl From<UserStatsDTO> for UserStats {
    fn from(value: UserStatsDTO) -> Self {
        UserStats {
            user_id: value.user_id,
            username: value.username,
            first_name: value.first_name,
            last_activity: value.last_activity.unwrap_or_else(Utc::now),
            total_uploads: value.total_uploads.unwrap_or(0),
            total_downloads: value.total_downloads.unwrap_or(0),
            storage_used: value.storage_used.unwrap_or(0),
        }
    }
}
