use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortUrlRecord {
    #[serde(rename = "shortCode")]
    pub short_code: String,
    #[serde(rename = "shortUrl")]
    pub short_url: String,
    #[serde(rename = "originalUrl")]
    pub original_url: String,
    pub alias: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    #[serde(rename = "fileId")]
    pub file_id: Option<String>,
    #[serde(rename = "createdDate")]
    pub created_date: DateTime<Utc>,
}
