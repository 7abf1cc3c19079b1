use async_trait::async_trait;

use crate::{
    domain::models::{file::InboundFile, file_record::ChannelMessageRef},
    services::ServiceError,
};

/// A chat channel used as a blob store, addressed by message reference.
#[async_trait]
pub trait StorageChannel: Send + Sync {
    /// Posts the inbound file into the storage channel.
    async fn relay(
        &self,
        file: &InboundFile,
        caption: &str,
    ) -> Result<ChannelMessageRef, ServiceError>;

    /// Re-serves a stored message into the requester's chat.
    async fn deliver(&self, message: &ChannelMessageRef, chat_id: i64) -> Result<(), ServiceError>;

    /// Fetches the raw bytes of an inbound file.
    async fn download(&self, file: &InboundFile) -> Result<Vec<u8>, ServiceError>;
}
