use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::short_url::ShortUrlRecord;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShortUrlDTO {
    #[serde(default)]
    pub short_code: String,
    pub short_url: Option<String>,
    pub original_url: Option<String>,
    pub alias: Option<String>,
    pub user_id: Option<i64>,
    pub file_id: Option<String>,
    pub created_date: Option<DateTime<Utc>>,
}

impl From<ShortUrlRecord> for ShortUrlDTO {
    fn from(value: ShortUrlRecord) -> Self {
        ShortUrlDTO {
            short_code: value.short_code,
            short_url: Some(value.short_url),
            original_url: Some(value.original_url),
            alias: value.alias,
            user_id: value.user_id,
            file_id: value.file_id,
            created_date: Some(value.created_date),
        }
    }
}

impl From<ShortUrlDTO> for ShortUrlRecord {
    fn from(value: ShortUrlDTO) -> Self {
        ShortUrlRecord {
            short_url: value.short_url.unwrap_or_else(|| value.short_code.clone()),
            short_code: value.short_code,
            original_url: value.original_url.unwrap_or_default(),
            alias: value.alias,
            user_id: value.user_id,
            file_id: value.file_id,
            created_date: value.created_date.unwrap_or_else(Utc::now),
        }
    }
}
