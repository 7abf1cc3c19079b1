use axum::{extract::State, Json};
use tracing::info;

use crate::{
    adapters::state::AppState, application::error::ApplicationError,
    domain::models::file_record::FileStats,
};

pub struct StatsController;

impl StatsController {
    /// GET /stats
    pub async fn file_stats(
        State(app_state): State<AppState>,
    ) -> Result<Json<FileStats>, ApplicationError> {
        info!("File statistics requested");
        let stats = app_state.file_service.stats().await?;
        Ok(Json(stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::services::{
            fakes::{app_state, harness, inbound, test_settings, MemoryDrive},
            file_service::UploadRequest,
        },
        domain::models::file::FileKind,
    };

    #[tokio::test]
    async fn stats_endpoint_counts_active_files() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![0; 12]);
        h.service
            .upload(UploadRequest {
                file: inbound("src", Some("a.csv"), 12, FileKind::Document),
                owner: 1,
                is_private: false,
            })
            .await
            .unwrap();

        let Json(stats) = StatsController::file_stats(State(app_state(&h))).await.unwrap();
        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.total_size, 12);
        assert_eq!(stats.file_types.get("document"), Some(&1));
    }
}
