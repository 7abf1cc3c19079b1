use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::application::dto::user_dto::UserStatsDTO;

impl FromRow<'_, SqliteRow> for UserStatsDTO {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let total_uploads: i64 = row.try_get("total_uploads")?;
        let total_downloads: i64 = row.try_get("total_downloads")?;
        let storage_used: i64 = row.try_get("storage_used")?;

        Ok(UserStatsDTO {
            user_id: row.try_get("user_id")?,
            username: row.try_get("username")?,
            first_name: row.try_get("first_name")?,
            last_activity: Some(row.try_get("last_activity")?),
            total_uploads: Some(total_uploads.max(0) as u64),
            total_downloads: Some(total_downloads.max(0) as u64),
            storage_used: Some(storage_used.max(0) as u64),
        })
    }
}
