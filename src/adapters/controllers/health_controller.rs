use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tracing::info;

use crate::adapters::state::{AppState, Integrations};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(rename = "botUsername")]
    pub bot_username: String,
    pub integrations: Integrations,
    pub config: HealthConfigInfo,
    pub metrics: SystemMetrics,
}

#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
    #[serde(rename = "processMemoryBytes")]
    pub process_memory_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct HealthConfigInfo {
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,
    #[serde(rename = "allowedFileTypes")]
    pub allowed_file_types: Vec<String>,
}

pub struct HealthController;

impl HealthController {
    /// GET /
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let process_memory = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid: Pid| {
                sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
                sys.process(pid).map(|p| p.memory())
            })
            .unwrap_or(0);

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            bot_username: app_state.bot_username.clone(),
            integrations: app_state.integrations,
            config: HealthConfigInfo {
                max_file_size: app_state.settings.max_file_size,
                allowed_file_types: app_state.settings.allowed_file_types.clone(),
            },
            metrics: SystemMetrics {
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_used_bytes: memory_used,
                memory_total_bytes: memory_total,
                memory_usage_percent,
                process_memory_bytes: process_memory,
            },
        })
    }
}
