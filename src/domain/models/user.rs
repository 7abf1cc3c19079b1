use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub username: Option<String>,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastActivity")]
    pub last_activity: DateTime<Utc>,
    #[serde(rename = "totalUploads")]
    pub total_uploads: u64,
    #[serde(rename = "totalDownloads")]
    pub total_downloads: u64,
    #[serde(rename = "storageUsed")]
    pub storage_used: u64,
}
