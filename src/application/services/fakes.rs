use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::{
    adapters::{
        repositories::{
            test_pool, SqliteAiInteractionRepository, SqliteFileRepository,
            SqliteShortUrlRepository, SqliteUserRepository,
        },
        state::{AppState, Integrations},
    },
    application::services::{
        ai_service::AiService, chat_assistant::ChatAssistant, drive_service::DriveService,
        file_service::FileService, link_service::LinkService, link_shortener::LinkShortener,
        storage_channel::StorageChannel,
    },
    domain::{
        config::settings::Settings,
        models::{
            file::{FileData, FileKind, InboundFile},
            file_record::ChannelMessageRef,
        },
    },
    services::{DisabledAiService, DisabledLinkShortener, ServiceError},
};

pub const CHANNEL_ID: i64 = -100_123;
pub const ADMIN: i64 = 9000;

pub fn test_settings() -> Settings {
    Settings {
        storage_channel_id: CHANNEL_ID.to_string(),
        bot_username: Some("vault_bot".to_string()),
        admin_user_ids: vec![ADMIN],
        ..Settings::default()
    }
}

pub fn inbound(source: &str, name: Option<&str>, size: u64, kind: FileKind) -> InboundFile {
    InboundFile {
        source: source.to_string(),
        file_name: name.map(str::to_string),
        size,
        mime_type: None,
        kind,
    }
}

/// Channel that keeps message bytes in memory and records deliveries.
#[derive(Default)]
pub struct MemoryChannel {
    sources: Mutex<HashMap<String, Vec<u8>>>,
    messages: Mutex<HashMap<i32, Vec<u8>>>,
    deliveries: Mutex<Vec<(i64, Vec<u8>)>>,
    next_message_id: AtomicI32,
    relay_calls: AtomicUsize,
    fail_relay: AtomicBool,
}

impl MemoryChannel {
    pub fn register(&self, source: &str, bytes: Vec<u8>) {
        self.sources
            .lock()
            .unwrap()
            .insert(source.to_string(), bytes);
    }

    pub fn set_fail_relay(&self, fail: bool) {
        self.fail_relay.store(fail, Ordering::SeqCst);
    }

    /// Simulates the stored message being removed from the channel by hand.
    pub fn forget_message(&self, message_id: i32) {
        self.messages.lock().unwrap().remove(&message_id);
    }

    pub fn relay_count(&self) -> usize {
        self.relay_calls.load(Ordering::SeqCst)
    }

    pub fn deliveries(&self) -> Vec<(i64, Vec<u8>)> {
        self.deliveries.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageChannel for MemoryChannel {
    async fn relay(
        &self,
        file: &InboundFile,
        _caption: &str,
    ) -> Result<ChannelMessageRef, ServiceError> {
        self.relay_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_relay.load(Ordering::SeqCst) {
            return Err(ServiceError::NetworkError("channel unreachable".to_string()));
        }

        let bytes = self.download(file).await?;
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.messages.lock().unwrap().insert(message_id, bytes);

        Ok(ChannelMessageRef {
            channel_id: CHANNEL_ID,
            message_id,
        })
    }

    async fn deliver(&self, message: &ChannelMessageRef, chat_id: i64) -> Result<(), ServiceError> {
        let bytes = self
            .messages
            .lock()
            .unwrap()
            .get(&message.message_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("message {}", message.message_id)))?;
        self.deliveries.lock().unwrap().push((chat_id, bytes));
        Ok(())
    }

    async fn download(&self, file: &InboundFile) -> Result<Vec<u8>, ServiceError> {
        self.sources
            .lock()
            .unwrap()
            .get(&file.source)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(file.source.clone()))
    }
}

pub struct MemoryDrive {
    max_size: Option<u64>,
    fail: bool,
    uploads: Mutex<Vec<FileData>>,
}

impl MemoryDrive {
    pub fn disabled() -> Self {
        Self {
            max_size: None,
            fail: false,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn accepting(max_size: u64) -> Self {
        Self {
            max_size: Some(max_size),
            ..Self::disabled()
        }
    }

    pub fn failing() -> Self {
        Self {
            max_size: Some(u64::MAX),
            fail: true,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DriveService for MemoryDrive {
    fn is_enabled(&self) -> bool {
        self.max_size.is_some()
    }

    fn accepts(&self, size: u64) -> bool {
        self.max_size.is_some_and(|max| size <= max)
    }

    async fn upload(&self, file_data: FileData) -> Result<String, ServiceError> {
        if self.fail {
            return Err(ServiceError::ProviderError("quota exceeded".to_string()));
        }
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(file_data);
        Ok(format!(
            "https://drive.google.com/file/d/fake{}/view",
            uploads.len()
        ))
    }
}

/// AI backend that echoes prompts, or fails as if the network were down.
pub struct ScriptedAi {
    reachable: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedAi {
    pub fn echo() -> Self {
        Self {
            reachable: true,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AiService for ScriptedAi {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.reachable {
            Ok(format!("echo: {}", prompt))
        } else {
            Err(ServiceError::NetworkError("Connection failed".to_string()))
        }
    }
}

/// Shortener issuing sequential codes, never deduplicating.
#[derive(Default)]
pub struct CountingShortener {
    fail: bool,
    calls: AtomicUsize,
}

impl CountingShortener {
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinkShortener for CountingShortener {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn shorten(&self, _url: &str, alias: Option<&str>) -> Result<String, ServiceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(ServiceError::ProviderError("GPLinks API error: 500".to_string()));
        }
        match alias {
            Some(alias) => Ok(format!("https://gplinks.co/{}", alias)),
            None => Ok(format!("https://gplinks.co/S{}", n)),
        }
    }
}

pub struct Harness {
    pub _dir: TempDir,
    pub pool: SqlitePool,
    pub channel: Arc<MemoryChannel>,
    pub drive: Arc<MemoryDrive>,
    pub service: Arc<FileService>,
}

pub async fn harness(settings: Settings, drive: MemoryDrive) -> Harness {
    let (dir, pool) = test_pool().await;
    let channel = Arc::new(MemoryChannel::default());
    let drive = Arc::new(drive);
    let bot_username = settings
        .bot_username
        .clone()
        .unwrap_or_else(|| "vault_bot".to_string());

    let service = Arc::new(FileService::new(
        Arc::new(settings),
        bot_username,
        Arc::new(SqliteFileRepository::new(pool.clone())),
        Arc::new(SqliteUserRepository::new(pool.clone())),
        channel.clone(),
        drive.clone(),
    ));

    Harness {
        _dir: dir,
        pool,
        channel,
        drive,
        service,
    }
}

/// Bot state over the harness with every optional integration disabled.
pub fn app_state(h: &Harness) -> AppState {
    AppState {
        bot_username: "vault_bot".to_string(),
        settings: Arc::new(test_settings()),
        integrations: Integrations {
            ai: false,
            url_shortener: false,
            google_drive: false,
        },
        file_service: h.service.clone(),
        link_service: Arc::new(LinkService::new(
            Arc::new(DisabledLinkShortener),
            Arc::new(SqliteShortUrlRepository::new(h.pool.clone())),
            h.service.clone(),
        )),
        chat_assistant: Arc::new(ChatAssistant::new(
            Arc::new(DisabledAiService),
            h.service.clone(),
            Arc::new(SqliteAiInteractionRepository::new(h.pool.clone())),
        )),
        user_repository: Arc::new(SqliteUserRepository::new(h.pool.clone())),
    }
}
