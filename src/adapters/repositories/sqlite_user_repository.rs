use async_trait::async_trait;
use chrono::Utc;
use sqlx::{query, query_as, SqlitePool};

use crate::{
    application::{
        dto::user_dto::UserStatsDTO, error::ApplicationError,
        repositories::user_repository::UserRepository,
    },
    domain::models::user::{UserProfile, UserStats},
};

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn touch_user(&self, profile: &UserProfile) -> Result<(), ApplicationError> {
        let query_str = r#"
            INSERT INTO user_sessions (user_id, username, first_name, last_activity)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name,
                last_activity = excluded.last_activity
        "#;

        query(query_str)
            .bind(profile.user_id)
            .bind(&profile.username)
            .bind(&profile.first_name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn record_upload(&self, user_id: i64, bytes: u64) -> Result<(), ApplicationError> {
        let query_str = r#"
            INSERT INTO user_sessions (user_id, last_activity, total_uploads, storage_used)
            VALUES (?, ?, 1, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                total_uploads = total_uploads + 1,
                storage_used = storage_used + excluded.storage_used,
                last_activity = excluded.last_activity
        "#;

        query(query_str)
            .bind(user_id)
            .bind(Utc::now())
            .bind(std::cmp::min(bytes, i64::MAX as u64) as i64)
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn record_download(&self, user_id: i64) -> Result<(), ApplicationError> {
        let query_str = r#"
            INSERT INTO user_sessions (user_id, last_activity, total_downloads)
            VALUES (?, ?, 1)
            ON CONFLICT(user_id) DO UPDATE SET
                total_downloads = total_downloads + 1,
                last_activity = excluded.last_activity
        "#;

        query(query_str)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn get_user_stats(&self, user_id: i64) -> Result<Option<UserStats>, ApplicationError> {
        let query_str = "SELECT * FROM user_sessions WHERE user_id = ?";

        let fetched: Option<UserStatsDTO> = query_as::<_, UserStatsDTO>(query_str)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(fetched.map(|dto| dto.into()))
    }
}
