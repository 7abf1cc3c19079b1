use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};

use crate::{
    application::{
        dto::short_url_dto::ShortUrlDTO, error::ApplicationError,
        repositories::short_url_repository::ShortUrlRepository,
    },
    domain::models::short_url::ShortUrlRecord,
};

pub struct SqliteShortUrlRepository {
    pool: SqlitePool,
}

impl SqliteShortUrlRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShortUrlRepository for SqliteShortUrlRepository {
    async fn create_short_url(&self, url: ShortUrlDTO) -> Result<ShortUrlRecord, ApplicationError> {
        let query = r#"
            INSERT INTO shortened_urls (
                short_code, short_url, original_url, alias, user_id, file_id, created_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let new_url: ShortUrlRecord = url.into();

        let created: ShortUrlDTO = query_as::<_, ShortUrlDTO>(query)
            .bind(&new_url.short_code)
            .bind(&new_url.short_url)
            .bind(&new_url.original_url)
            .bind(&new_url.alias)
            .bind(new_url.user_id)
            .bind(&new_url.file_id)
            .bind(new_url.created_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(created.into())
    }

    async fn get_by_code(
        &self,
        short_code: &str,
    ) -> Result<Option<ShortUrlRecord>, ApplicationError> {
        let query = "SELECT * FROM shortened_urls WHERE short_code = ?";

        let fetched: Option<ShortUrlDTO> = query_as::<_, ShortUrlDTO>(query)
            .bind(short_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(fetched.map(|dto| dto.into()))
    }

    async fn list_for_file(&self, file_id: &str) -> Result<Vec<ShortUrlRecord>, ApplicationError> {
        let query = "SELECT * FROM shortened_urls WHERE file_id = ? ORDER BY id DESC";

        let rows: Vec<ShortUrlDTO> = query_as::<_, ShortUrlDTO>(query)
            .bind(file_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(rows.into_iter().map(|dto| dto.into()).collect())
    }
}
