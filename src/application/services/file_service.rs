use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::{
    application::{
        dto::file_record_dto::FileRecordDTO,
        error::ApplicationError,
        repositories::{file_repository::FileRepository, user_repository::UserRepository},
        services::{drive_service::DriveService, storage_channel::StorageChannel},
    },
    domain::{
        config::settings::Settings,
        models::{
            file::{format_file_size, FileData, InboundFile},
            file_record::{FileRecord, FileStats},
            identifier::{generate_file_id, is_well_formed},
        },
    },
};

const ID_ALLOCATION_ATTEMPTS: usize = 5;

#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: InboundFile,
    pub owner: i64,
    pub is_private: bool,
}

#[derive(Debug, Clone)]
pub struct UploadReceipt {
    pub record: FileRecord,
    pub link: String,
}

pub struct FileService {
    settings: Arc<Settings>,
    bot_username: String,
    files: Arc<dyn FileRepository>,
    users: Arc<dyn UserRepository>,
    channel: Arc<dyn StorageChannel>,
    drive: Arc<dyn DriveService>,
}

impl FileService {
    pub fn new(
        settings: Arc<Settings>,
        bot_username: String,
        files: Arc<dyn FileRepository>,
        users: Arc<dyn UserRepository>,
        channel: Arc<dyn StorageChannel>,
        drive: Arc<dyn DriveService>,
    ) -> Self {
        Self {
            settings,
            bot_username,
            files,
            users,
            channel,
            drive,
        }
    }

    pub fn retrieval_link(&self, file_id: &str) -> String {
        format!("https://t.me/{}?start={}", self.bot_username, file_id)
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.settings.is_admin(user_id)
    }

    /// Size and type checks. Runs before any external call.
    pub fn validate(&self, file: &InboundFile) -> Result<(), ApplicationError> {
        if file.size > self.settings.max_file_size {
            return Err(ApplicationError::PayloadTooLarge {
                size: file.size,
                max: self.settings.max_file_size,
            });
        }

        let extension = file.extension();
        if !self.settings.allows_extension(&extension) {
            let reason = if extension.is_empty() {
                "files without an extension are not allowed".to_string()
            } else {
                format!("file type '.{}' is not allowed", extension)
            };
            return Err(ApplicationError::Validation(reason));
        }

        Ok(())
    }

    pub async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, ApplicationError> {
        let UploadRequest {
            file,
            owner,
            is_private,
        } = request;

        if let Err(e) = self.validate(&file) {
            warn!("Rejected upload from user {}: {}", owner, e);
            return Err(e);
        }

        let file_id = self.allocate_file_id().await?;
        let filename = file.display_name();
        let caption = storage_caption(&file_id, &filename, &file);

        let message = self.channel.relay(&file, &caption).await.map_err(|e| {
            error!("Relay of {} to the storage channel failed: {}", file_id, e);
            ApplicationError::StorageRelay(e.to_string())
        })?;

        let record_dto = FileRecordDTO {
            file_id: file_id.clone(),
            filename: Some(filename),
            file_size: Some(file.size),
            file_type: Some(file.kind.as_str().to_string()),
            mime_type: file.mime_type.clone(),
            channel_id: Some(message.channel_id),
            message_id: Some(message.message_id),
            user_id: Some(owner),
            download_count: Some(0),
            is_private: Some(is_private),
            is_deleted: Some(false),
            google_drive_link: None,
            upload_date: Some(Utc::now()),
        };

        let mut record = self.files.create_file(record_dto).await.map_err(|e| {
            error!(
                "Relayed {} to message {} but could not record it: {}",
                file_id, message.message_id, e
            );
            e
        })?;

        info!(
            "Stored file {} ({}) for user {} at channel message {}",
            record.file_id,
            format_file_size(record.file_size),
            owner,
            record.message.message_id
        );

        if let Err(e) = self.users.record_upload(owner, file.size).await {
            warn!("Could not update upload stats for user {}: {}", owner, e);
        }

        if self.drive.accepts(file.size) {
            self.copy_to_drive(&mut record, &file).await;
        }

        let link = self.retrieval_link(&record.file_id);
        Ok(UploadReceipt { record, link })
    }

    /// Looks up an active record the requester is allowed to see.
    pub async fn get_file(&self, file_id: &str, requester: i64) -> Result<FileRecord, ApplicationError> {
        if !is_well_formed(file_id) {
            return Err(ApplicationError::NotFound);
        }

        let record = self
            .files
            .get_active_file(file_id)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        if !record.is_visible_to(requester, self.is_admin(requester)) {
            warn!("User {} denied access to private file {}", requester, file_id);
            return Err(ApplicationError::Unauthorized);
        }

        Ok(record)
    }

    /// Counts the download and copies the stored message into `chat_id`.
    pub async fn retrieve(
        &self,
        file_id: &str,
        requester: i64,
        chat_id: i64,
    ) -> Result<FileRecord, ApplicationError> {
        let record = self.get_file(file_id, requester).await?;

        let record = self
            .files
            .increment_download_count(&record.file_id)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        self.channel
            .deliver(&record.message, chat_id)
            .await
            .map_err(|e| {
                error!(
                    "Delivery of {} from channel message {} failed: {}",
                    record.file_id, record.message.message_id, e
                );
                ApplicationError::StorageRelay(e.to_string())
            })?;

        if let Err(e) = self.users.record_download(requester).await {
            warn!("Could not update download stats for user {}: {}", requester, e);
        }

        info!(
            "Served file {} to user {} (download #{})",
            record.file_id, requester, record.download_count
        );
        Ok(record)
    }

    /// Soft delete, allowed for the uploader and for admins. The channel
    /// message and any Drive copy stay where they are.
    pub async fn delete(&self, file_id: &str, requester: i64) -> Result<FileRecord, ApplicationError> {
        if !is_well_formed(file_id) {
            return Err(ApplicationError::NotFound);
        }

        let record = self
            .files
            .get_active_file(file_id)
            .await?
            .ok_or(ApplicationError::NotFound)?;

        if !record.is_owned_by(requester) && !self.is_admin(requester) {
            warn!("User {} tried to delete file {} they do not own", requester, file_id);
            return Err(ApplicationError::Unauthorized);
        }

        if !self.files.soft_delete(file_id).await? {
            return Err(ApplicationError::NotFound);
        }

        info!("File {} soft-deleted by user {}", file_id, requester);
        Ok(record)
    }

    pub async fn list_files(&self, owner: i64, limit: u32) -> Result<Vec<FileRecord>, ApplicationError> {
        self.files.list_user_files(owner, limit, 0).await
    }

    pub async fn stats(&self) -> Result<FileStats, ApplicationError> {
        self.files.get_file_stats().await
    }

    async fn allocate_file_id(&self) -> Result<String, ApplicationError> {
        for _ in 0..ID_ALLOCATION_ATTEMPTS {
            let candidate = generate_file_id();
            if !self.files.file_id_exists(&candidate).await? {
                return Ok(candidate);
            }
            warn!("Generated file id {} already exists, regenerating", candidate);
        }

        Err(ApplicationError::InternalError(
            "could not allocate a unique file id".to_string(),
        ))
    }

    async fn copy_to_drive(&self, record: &mut FileRecord, file: &InboundFile) {
        let content = match self.channel.download(file).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping Drive copy of {}: download failed: {}", record.file_id, e);
                return;
            }
        };

        let file_data = FileData::new(content, record.filename.clone(), file.mime_or_default());
        let link = match self.drive.upload(file_data).await {
            Ok(link) => link,
            Err(e) => {
                warn!("Drive copy of {} failed: {}", record.file_id, e);
                return;
            }
        };

        match self.files.set_drive_link(&record.file_id, &link).await {
            Ok(()) => {
                info!("File {} copied to Drive", record.file_id);
                record.google_drive_link = Some(link);
            }
            Err(e) => warn!("Could not save Drive link for {}: {}", record.file_id, e),
        }
    }
}

fn storage_caption(file_id: &str, filename: &str, file: &InboundFile) -> String {
    format!(
        "📄 File Storage\n🆔 ID: {}\n📝 Name: {}\n📊 Size: {}\n📁 Type: {}",
        file_id,
        filename,
        format_file_size(file.size),
        file.kind
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        application::services::fakes::{harness, inbound, test_settings, MemoryDrive, ADMIN},
        domain::models::file::FileKind,
    };

    const OWNER: i64 = 1001;
    const STRANGER: i64 = 2002;

    fn request(file: InboundFile) -> UploadRequest {
        UploadRequest {
            file,
            owner: OWNER,
            is_private: false,
        }
    }

    #[tokio::test]
    async fn ten_megabyte_document_round_trip() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        let payload: Vec<u8> = (0..10 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        h.channel.register("doc-src", payload.clone());

        let receipt = h
            .service
            .upload(request(inbound("doc-src", Some("report.pdf"), payload.len() as u64, FileKind::Document)))
            .await
            .unwrap();

        assert!(receipt.link.ends_with(&receipt.record.file_id));
        assert!(receipt.link.starts_with("https://t.me/vault_bot?start="));
        assert_eq!(receipt.record.download_count, 0);

        let served = h
            .service
            .retrieve(&receipt.record.file_id, STRANGER, STRANGER)
            .await
            .unwrap();

        assert_eq!(served.download_count, 1);
        let deliveries = h.channel.deliveries();
        assert_eq!(deliveries.len(), 1);
        assert_eq!(deliveries[0].0, STRANGER);
        assert!(deliveries[0].1 == payload);
    }

    #[tokio::test]
    async fn oversized_upload_never_reaches_channel() {
        let mut settings = test_settings();
        settings.max_file_size = 1024;
        let h = harness(settings, MemoryDrive::disabled()).await;
        h.channel.register("big", vec![0; 2048]);

        let err = h
            .service
            .upload(request(inbound("big", Some("big.zip"), 2048, FileKind::Document)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::PayloadTooLarge { size: 2048, max: 1024 }));
        assert_eq!(h.channel.relay_count(), 0);
        assert_eq!(h.service.stats().await.unwrap().total_files, 0);
    }

    #[tokio::test]
    async fn disallowed_type_creates_no_record() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("bad", vec![1, 2, 3]);

        let err = h
            .service
            .upload(request(inbound("bad", Some("payload.xyz"), 3, FileKind::Document)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::Validation(_)));
        assert_eq!(h.channel.relay_count(), 0);
        assert_eq!(h.service.stats().await.unwrap().total_files, 0);
    }

    #[tokio::test]
    async fn relay_failure_leaves_no_metadata() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![9; 16]);
        h.channel.set_fail_relay(true);

        let err = h
            .service
            .upload(request(inbound("src", Some("notes.txt"), 16, FileKind::Document)))
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::StorageRelay(_)));
        assert_eq!(h.service.stats().await.unwrap().total_files, 0);
        assert!(h.service.list_files(OWNER, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn soft_deleted_file_is_not_found() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![5; 32]);
        let receipt = h
            .service
            .upload(request(inbound("src", Some("a.txt"), 32, FileKind::Document)))
            .await
            .unwrap();
        let file_id = receipt.record.file_id;

        let err = h.service.delete(&file_id, STRANGER).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized));

        h.service.delete(&file_id, OWNER).await.unwrap();

        let err = h.service.retrieve(&file_id, OWNER, OWNER).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
        let err = h.service.delete(&file_id, OWNER).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
        assert!(h.channel.deliveries().is_empty());
    }

    #[tokio::test]
    async fn admin_may_delete_any_file() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![5; 32]);
        let receipt = h
            .service
            .upload(request(inbound("src", Some("a.txt"), 32, FileKind::Document)))
            .await
            .unwrap();

        h.service.delete(&receipt.record.file_id, ADMIN).await.unwrap();
        assert_eq!(h.service.stats().await.unwrap().total_files, 0);
    }

    #[tokio::test]
    async fn private_file_is_limited_to_owner_and_admin() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![1; 8]);
        let receipt = h
            .service
            .upload(UploadRequest {
                file: inbound("src", Some("secret.txt"), 8, FileKind::Document),
                owner: OWNER,
                is_private: true,
            })
            .await
            .unwrap();
        let file_id = receipt.record.file_id;

        let err = h.service.retrieve(&file_id, STRANGER, STRANGER).await.unwrap_err();
        assert!(matches!(err, ApplicationError::Unauthorized));

        h.service.retrieve(&file_id, OWNER, OWNER).await.unwrap();
        let served = h.service.retrieve(&file_id, ADMIN, ADMIN).await.unwrap();
        assert_eq!(served.download_count, 2);
    }

    #[tokio::test]
    async fn delivery_failure_counts_once_and_reports_relay_error() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![3; 8]);
        let receipt = h
            .service
            .upload(request(inbound("src", Some("a.txt"), 8, FileKind::Document)))
            .await
            .unwrap();
        h.channel.forget_message(receipt.record.message.message_id);

        let err = h
            .service
            .retrieve(&receipt.record.file_id, OWNER, OWNER)
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::StorageRelay(_)));

        let record = h.service.get_file(&receipt.record.file_id, OWNER).await.unwrap();
        assert_eq!(record.download_count, 1);
    }

    #[tokio::test]
    async fn concurrent_retrievals_are_all_counted() {
        const N: u64 = 40;
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("src", vec![7; 64]);
        let receipt = h
            .service
            .upload(request(inbound("src", Some("shared.txt"), 64, FileKind::Document)))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for i in 0..N {
            let service = h.service.clone();
            let file_id = receipt.record.file_id.clone();
            tasks.push(tokio::spawn(async move {
                service.retrieve(&file_id, 5000 + i as i64, 5000 + i as i64).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let record = h.service.get_file(&receipt.record.file_id, OWNER).await.unwrap();
        assert_eq!(record.download_count, N);
        assert_eq!(h.channel.deliveries().len() as u64, N);
    }

    #[tokio::test]
    async fn drive_copy_sets_link_and_failures_are_ignored() {
        let h = harness(test_settings(), MemoryDrive::accepting(1024)).await;
        h.channel.register("small", vec![4; 100]);
        let receipt = h
            .service
            .upload(request(inbound("small", Some("small.png"), 100, FileKind::Document)))
            .await
            .unwrap();
        assert!(receipt.record.google_drive_link.is_some());
        let stored = h.service.get_file(&receipt.record.file_id, OWNER).await.unwrap();
        assert_eq!(stored.google_drive_link, receipt.record.google_drive_link);
        assert_eq!(h.drive.upload_count(), 1);

        h.channel.register("large", vec![4; 4096]);
        let receipt = h
            .service
            .upload(request(inbound("large", Some("large.png"), 4096, FileKind::Document)))
            .await
            .unwrap();
        assert!(receipt.record.google_drive_link.is_none());
        assert_eq!(h.drive.upload_count(), 1);

        let failing = harness(test_settings(), MemoryDrive::failing()).await;
        failing.channel.register("src", vec![1; 10]);
        let receipt = failing
            .service
            .upload(request(inbound("src", Some("x.txt"), 10, FileKind::Document)))
            .await
            .unwrap();
        assert!(receipt.record.google_drive_link.is_none());
        failing
            .service
            .retrieve(&receipt.record.file_id, OWNER, OWNER)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listing_and_stats_skip_deleted_files() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        h.channel.register("a", vec![0; 10]);
        h.channel.register("b", vec![0; 20]);

        let first = h
            .service
            .upload(request(inbound("a", Some("a.txt"), 10, FileKind::Document)))
            .await
            .unwrap();
        h.service
            .upload(request(inbound("b", None, 20, FileKind::Photo)))
            .await
            .unwrap();

        let stats = h.service.stats().await.unwrap();
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_size, 30);
        assert_eq!(stats.file_types.get("photo"), Some(&1));

        h.service.delete(&first.record.file_id, OWNER).await.unwrap();
        let listed = h.service.list_files(OWNER, 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].file_type, FileKind::Photo);
    }

    #[tokio::test]
    async fn malformed_identifier_is_not_found() {
        let h = harness(test_settings(), MemoryDrive::disabled()).await;
        let err = h.service.retrieve("not an id", OWNER, OWNER).await.unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound));
    }
}
