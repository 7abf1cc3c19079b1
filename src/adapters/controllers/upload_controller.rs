use teloxide::prelude::*;
use tracing::{info, warn};

use crate::{
    adapters::{
        controllers::{command_controller::touch_sender, replies},
        state::AppState,
    },
    application::services::file_service::UploadRequest,
    domain::models::file::{FileKind, InboundFile},
};

const PRIVATE_TAG: &str = "#private";

/// Pulls the attached file out of a message. Photos use the largest size.
pub fn inbound_file(msg: &Message) -> Option<InboundFile> {
    if let Some(document) = msg.document() {
        return Some(InboundFile {
            source: document.file.id.0.clone(),
            file_name: document.file_name.clone(),
            size: document.file.size as u64,
            mime_type: document.mime_type.as_ref().map(|m| m.to_string()),
            kind: FileKind::Document,
        });
    }

    if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(InboundFile {
            source: photo.file.id.0.clone(),
            file_name: None,
            size: photo.file.size as u64,
            mime_type: None,
            kind: FileKind::Photo,
        });
    }

    if let Some(video) = msg.video() {
        return Some(InboundFile {
            source: video.file.id.0.clone(),
            file_name: video.file_name.clone(),
            size: video.file.size as u64,
            mime_type: video.mime_type.as_ref().map(|m| m.to_string()),
            kind: FileKind::Video,
        });
    }

    msg.audio().map(|audio| InboundFile {
        source: audio.file.id.0.clone(),
        file_name: audio.file_name.clone(),
        size: audio.file.size as u64,
        mime_type: audio.mime_type.as_ref().map(|m| m.to_string()),
        kind: FileKind::Audio,
    })
}

pub fn is_private_caption(caption: Option<&str>) -> bool {
    caption.is_some_and(|c| c.to_lowercase().contains(PRIVATE_TAG))
}

pub struct UploadController;

impl UploadController {
    pub fn has_file(msg: Message) -> bool {
        inbound_file(&msg).is_some()
    }

    pub async fn handle(bot: Bot, msg: Message, state: AppState) -> ResponseResult<()> {
        let Some(file) = inbound_file(&msg) else {
            return Ok(());
        };
        let Some(profile) = touch_sender(&state, &msg).await else {
            return Ok(());
        };

        info!(
            "User {} sent a {} of {} bytes",
            profile.user_id, file.kind, file.size
        );

        if let Err(e) = state.file_service.validate(&file) {
            e.log("Upload rejected");
            bot.send_message(msg.chat.id, e.user_message()).await?;
            return Ok(());
        }

        let status = bot.send_message(msg.chat.id, replies::PROCESSING).await?;

        let request = UploadRequest {
            file,
            owner: profile.user_id,
            is_private: is_private_caption(msg.caption()),
        };

        let reply = match state.file_service.upload(request).await {
            Ok(receipt) => {
                let ai_note = if state.chat_assistant.is_enabled() {
                    state.chat_assistant.describe_upload(&receipt.record).await
                } else {
                    None
                };
                replies::upload_success(&receipt, ai_note.as_deref())
            }
            Err(e) => {
                e.log("Upload failed");
                e.user_message()
            }
        };

        if let Err(e) = bot
            .edit_message_text(msg.chat.id, status.id, reply.clone())
            .await
        {
            warn!("Could not edit processing message: {}", e);
            bot.send_message(msg.chat.id, reply).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(json: &str) -> Message {
        serde_json::from_str(json).unwrap()
    }

    const BASE: &str = r#""message_id":5,"date":1700000000,
        "chat":{"id":42,"type":"private","first_name":"Ada"},
        "from":{"id":42,"is_bot":false,"first_name":"Ada"}"#;

    #[test]
    fn document_keeps_name_and_mime() {
        let msg = message(&format!(
            r#"{{{},"document":{{"file_id":"DOC1","file_unique_id":"u1","file_size":1234,
                "file_name":"report.pdf","mime_type":"application/pdf"}}}}"#,
            BASE
        ));
        let file = inbound_file(&msg).unwrap();
        assert_eq!(file.kind, FileKind::Document);
        assert_eq!(file.source, "DOC1");
        assert_eq!(file.file_name.as_deref(), Some("report.pdf"));
        assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(file.size, 1234);
    }

    #[test]
    fn photo_uses_largest_size() {
        let msg = message(&format!(
            r#"{{{},"photo":[
                {{"file_id":"SMALL","file_unique_id":"s","file_size":100,"width":90,"height":90}},
                {{"file_id":"LARGE","file_unique_id":"l","file_size":9000,"width":1280,"height":1280}}
            ]}}"#,
            BASE
        ));
        let file = inbound_file(&msg).unwrap();
        assert_eq!(file.kind, FileKind::Photo);
        assert_eq!(file.source, "LARGE");
        assert_eq!(file.size, 9000);
    }

    #[test]
    fn plain_text_has_no_file() {
        let msg = message(&format!(r#"{{{},"text":"hello"}}"#, BASE));
        assert!(inbound_file(&msg).is_none());
    }

    #[test]
    fn private_tag_is_case_insensitive() {
        assert!(is_private_caption(Some("tax return #Private")));
        assert!(!is_private_caption(Some("holiday")));
        assert!(!is_private_caption(None));
    }
}
