mod adapters;
mod application;
mod domain;
mod services;

use std::sync::Arc;

use adapters::{
    controllers::{health_controller::HealthController, stats_controller::StatsController},
    repositories::{
        connect, SqliteAiInteractionRepository, SqliteFileRepository, SqliteShortUrlRepository,
        SqliteUserRepository,
    },
    state::{AppState, Integrations},
};
use application::{
    repositories::{
        ai_interaction_repository::AiInteractionRepository, file_repository::FileRepository,
        short_url_repository::ShortUrlRepository, user_repository::UserRepository,
    },
    services::{chat_assistant::ChatAssistant, file_service::FileService, link_service::LinkService},
};
use axum::{http::HeaderValue, routing::get, Router};
use services::TelegramStorageChannel;
use teloxide::prelude::*;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("ERROR: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), BoxError> {
    let (settings, secrets) = domain::config::load_from_env()?;
    let settings = Arc::new(settings);

    tracing::info!("Opening database at {}", settings.database_path.display());
    let pool = connect(&settings.database_path).await?;
    tracing::info!("Database ready");

    let bot = Bot::new(&secrets.bot_token);
    let bot_username = match &settings.bot_username {
        Some(username) => username.clone(),
        None => bot
            .get_me()
            .await?
            .user
            .username
            .clone()
            .ok_or("bot account has no username, set BOT_USERNAME")?,
    };
    tracing::info!("Running as @{}", bot_username);

    let http_client = services::create_http_client(settings.http_timeout)?;
    let ai_service = services::create_ai_service(&http_client, &settings, &secrets);
    let link_shortener = services::create_link_shortener(&http_client, &settings, &secrets);
    let drive_service = services::create_drive_service(&http_client, &secrets);

    let google_drive = drive_service.is_enabled();

    let file_repo = Arc::new(SqliteFileRepository::new(pool.clone())) as Arc<dyn FileRepository>;
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone())) as Arc<dyn UserRepository>;
    let short_url_repo =
        Arc::new(SqliteShortUrlRepository::new(pool.clone())) as Arc<dyn ShortUrlRepository>;
    let ai_interaction_repo =
        Arc::new(SqliteAiInteractionRepository::new(pool)) as Arc<dyn AiInteractionRepository>;

    let channel = Arc::new(TelegramStorageChannel::new(
        bot.clone(),
        &settings.storage_channel_id,
        settings.http_timeout,
    ));

    let file_service = Arc::new(FileService::new(
        settings.clone(),
        bot_username.clone(),
        file_repo,
        user_repo.clone(),
        channel,
        drive_service,
    ));

    let link_service = Arc::new(LinkService::new(
        link_shortener,
        short_url_repo,
        file_service.clone(),
    ));
    let chat_assistant = Arc::new(ChatAssistant::new(
        ai_service,
        file_service.clone(),
        ai_interaction_repo,
    ));

    let app_state = AppState {
        bot_username,
        settings: settings.clone(),
        integrations: Integrations {
            ai: chat_assistant.is_enabled(),
            url_shortener: link_service.is_enabled(),
            google_drive,
        },
        link_service,
        chat_assistant,
        file_service,
        user_repository: user_repo,
    };

    if let Some(port) = settings.port {
        serve_status(port, &settings.cors_allowed_origins, app_state.clone()).await?;
    }

    adapters::bot::run(bot, app_state).await;
    tracing::info!("Dispatcher stopped, shutting down");
    Ok(())
}

async fn serve_status(port: u16, allowed_origins: &[String], app_state: AppState) -> Result<(), BoxError> {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins = allowed_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let router = Router::new()
        .route("/", get(HealthController::health_check))
        .route("/stats", get(StatsController::file_stats))
        .layer(cors)
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Status server listening on 0.0.0.0:{}", port);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!("Status server stopped: {}", e);
        }
    });

    Ok(())
}
