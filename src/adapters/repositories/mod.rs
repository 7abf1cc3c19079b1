mod sqlite_ai_interaction_repository;
mod sqlite_file_repository;
mod sqlite_short_url_repository;
mod sqlite_user_repository;

pub use sqlite_ai_interaction_repository::SqliteAiInteractionRepository;
pub use sqlite_file_repository::SqliteFileRepository;
pub use sqlite_short_url_repository::SqliteShortUrlRepository;
pub use sqlite_user_repository::SqliteUserRepository;

use std::{path::Path, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::application::error::ApplicationError;

const MAX_CONNECTIONS: u32 = 5;

/// Opens (creating if needed) the metadata database and applies migrations.
pub async fn connect(path: &Path) -> Result<SqlitePool, ApplicationError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            ApplicationError::DatabaseError(format!(
                "cannot create database directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
pub async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let pool = connect(&dir.path().join("data").join("files.db"))
        .await
        .unwrap();
    (dir, pool)
}
