use std::{future::Future, time::Duration};

use async_trait::async_trait;
use teloxide::{
    net::Download,
    prelude::*,
    types::{FileId, InputFile, MessageId, Recipient},
    RequestError,
};
use tracing::debug;

use crate::{
    application::services::storage_channel::StorageChannel,
    domain::models::{
        file::{FileKind, InboundFile},
        file_record::ChannelMessageRef,
    },
    services::error::ServiceError,
};

/// Private Telegram channel holding every stored file as a message.
pub struct TelegramStorageChannel {
    bot: Bot,
    channel: Recipient,
    timeout: Duration,
}

impl TelegramStorageChannel {
    pub fn new(bot: Bot, channel_id: &str, timeout: Duration) -> Self {
        Self {
            bot,
            channel: parse_recipient(channel_id),
            timeout,
        }
    }

    async fn bounded<T, F>(&self, request: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, RequestError>>,
    {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(self.timeout.as_secs())),
        }
    }
}

/// Numeric ids (`-100...`) address the chat directly; anything else is a
/// public `@username`.
pub fn parse_recipient(channel_id: &str) -> Recipient {
    let channel_id = channel_id.trim();
    match channel_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if channel_id.starts_with('@') => Recipient::ChannelUsername(channel_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{}", channel_id)),
    }
}

#[async_trait]
impl StorageChannel for TelegramStorageChannel {
    async fn relay(
        &self,
        file: &InboundFile,
        caption: &str,
    ) -> Result<ChannelMessageRef, ServiceError> {
        let input = InputFile::file_id(FileId(file.source.clone()));
        let channel = self.channel.clone();
        let caption = caption.to_string();

        let message = match file.kind {
            FileKind::Document => {
                self.bounded(self.bot.send_document(channel, input).caption(caption).send())
                    .await?
            }
            FileKind::Photo => {
                self.bounded(self.bot.send_photo(channel, input).caption(caption).send())
                    .await?
            }
            FileKind::Video => {
                self.bounded(self.bot.send_video(channel, input).caption(caption).send())
                    .await?
            }
            FileKind::Audio => {
                self.bounded(self.bot.send_audio(channel, input).caption(caption).send())
                    .await?
            }
        };

        debug!(
            "Relayed {} into chat {} as message {}",
            file.kind, message.chat.id.0, message.id.0
        );

        Ok(ChannelMessageRef {
            channel_id: message.chat.id.0,
            message_id: message.id.0,
        })
    }

    async fn deliver(&self, message: &ChannelMessageRef, chat_id: i64) -> Result<(), ServiceError> {
        self.bounded(
            self.bot
                .copy_message(
                    ChatId(chat_id),
                    ChatId(message.channel_id),
                    MessageId(message.message_id),
                )
                .send(),
        )
        .await?;

        Ok(())
    }

    async fn download(&self, file: &InboundFile) -> Result<Vec<u8>, ServiceError> {
        let telegram_file = self
            .bounded(self.bot.get_file(FileId(file.source.clone())).send())
            .await?;

        let mut content = Vec::with_capacity(telegram_file.size as usize);
        match tokio::time::timeout(
            self.timeout,
            self.bot.download_file(&telegram_file.path, &mut content),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(ServiceError::Timeout(self.timeout.as_secs())),
        }

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        adapters::repositories::{test_pool, SqliteFileRepository, SqliteUserRepository},
        application::{
            error::ApplicationError,
            services::{
                fakes::{inbound, test_settings, MemoryDrive},
                file_service::{FileService, UploadRequest},
            },
        },
    };

    /// Bot API endpoint that accepts connections and never answers.
    async fn silent_bot() -> Bot {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        Bot::new("123456:test").set_api_url(reqwest::Url::parse(&format!("http://{}/", addr)).unwrap())
    }

    #[tokio::test]
    async fn pending_request_is_cut_off() {
        let channel = TelegramStorageChannel::new(
            Bot::new("123456:test"),
            "-100123",
            Duration::from_millis(50),
        );
        let result = channel
            .bounded(std::future::pending::<Result<(), RequestError>>())
            .await;
        assert!(matches!(result, Err(ServiceError::Timeout(_))));
    }

    #[tokio::test]
    async fn hanging_channel_fails_upload_without_a_record() {
        let channel = Arc::new(TelegramStorageChannel::new(
            silent_bot().await,
            "-100123",
            Duration::from_millis(200),
        ));
        let (_dir, pool) = test_pool().await;
        let service = FileService::new(
            Arc::new(test_settings()),
            "vault_bot".to_string(),
            Arc::new(SqliteFileRepository::new(pool.clone())),
            Arc::new(SqliteUserRepository::new(pool)),
            channel,
            Arc::new(MemoryDrive::disabled()),
        );

        let started = std::time::Instant::now();
        let err = service
            .upload(UploadRequest {
                file: inbound("SRC", Some("report.pdf"), 10, FileKind::Document),
                owner: 1,
                is_private: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::StorageRelay(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(service.stats().await.unwrap().total_files, 0);
    }

    #[test]
    fn channel_ids_and_usernames_are_recognised() {
        assert_eq!(parse_recipient("-1001234"), Recipient::Id(ChatId(-1001234)));
        assert_eq!(
            parse_recipient("@vault"),
            Recipient::ChannelUsername("@vault".to_string())
        );
        assert_eq!(
            parse_recipient("vault"),
            Recipient::ChannelUsername("@vault".to_string())
        );
    }
}
