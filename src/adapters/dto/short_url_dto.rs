use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::application::dto::short_url_dto::ShortUrlDTO;

impl FromRow<'_, SqliteRow> for ShortUrlDTO {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(ShortUrlDTO {
            short_code: row.try_get("short_code")?,
            short_url: Some(row.try_get("short_url")?),
            original_url: Some(row.try_get("original_url")?),
            alias: row.try_get("alias")?,
            user_id: row.try_get("user_id")?,
            file_id: row.try_get("file_id")?,
            created_date: Some(row.try_get("created_date")?),
        })
    }
}
