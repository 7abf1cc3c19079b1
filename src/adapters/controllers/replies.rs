use crate::{
    application::services::file_service::UploadReceipt,
    domain::models::{
        file::format_file_size,
        file_record::{FileRecord, FileStats},
        short_url::ShortUrlRecord,
        user::UserStats,
    },
};

pub const PROCESSING: &str = "⏳ Processing your file...";

pub const UPLOAD_INSTRUCTIONS: &str = "📤 Send me any document, photo, video or audio file and I'll store it.\n\n\
Add #private to the caption to keep the file visible only to you.";

pub fn welcome(first_name: Option<&str>, max_file_size: u64) -> String {
    format!(
        "👋 Welcome{}!\n\n\
         I store your files and give you a link to get them back at any time.\n\n\
         📤 Send me a file to upload it (up to {}).\n\
         📥 Open a share link or use /download <file_id> to retrieve one.\n\n\
         Use /help to see everything I can do.",
        first_name.map(|n| format!(", {}", n)).unwrap_or_default(),
        format_file_size(max_file_size)
    )
}

pub fn help(ai_enabled: bool, shortener_enabled: bool) -> String {
    let mut text = String::from(
        "📚 Commands\n\n\
         /upload - how to upload a file\n\
         /download <file_id> - get a stored file\n\
         /delete <file_id> - delete one of your files\n\
         /myfiles - your 10 most recent files\n\
         /mystats - your upload and download counters\n\
         /stats - storage statistics\n",
    );
    if shortener_enabled {
        text.push_str(
            "/short <url> [alias] - shorten a URL\n\
             /sharelink <file_id> - short link for a stored file\n\
             /expand <code> - show where a short link points\n",
        );
    }
    if ai_enabled {
        text.push_str(
            "/ai <question> - ask the AI assistant\n\
             /ai analyze <file_id> [question] - ask about a stored file\n\n\
             Any other text message is answered by the AI assistant.",
        );
    }
    text
}

pub fn upload_success(receipt: &UploadReceipt, ai_note: Option<&str>) -> String {
    let record = &receipt.record;
    let mut text = format!(
        "✅ File uploaded successfully!\n\n\
         📄 Name: {}\n\
         📊 Size: {}\n\
         🆔 File ID: {}\n",
        record.filename,
        format_file_size(record.file_size),
        record.file_id
    );
    if record.is_private {
        text.push_str("🔒 Private: only you can download it\n");
    }
    text.push_str(&format!(
        "\n🔗 Share link: {}\n📥 Or use: /download {}",
        receipt.link, record.file_id
    ));
    if let Some(drive_link) = &record.google_drive_link {
        text.push_str(&format!("\n☁️ Google Drive: {}", drive_link));
    }
    if let Some(note) = ai_note {
        text.push_str(&format!("\n\n🤖 {}", note));
    }
    text
}

pub fn file_list(files: &[FileRecord]) -> String {
    if files.is_empty() {
        return "📂 You haven't uploaded any files yet.".to_string();
    }

    let mut text = String::from("📂 Your recent files:\n");
    for (i, file) in files.iter().enumerate() {
        text.push_str(&format!(
            "\n{}. {}{}\n   🆔 {} | {} | 📥 {}",
            i + 1,
            file.filename,
            if file.is_private { " 🔒" } else { "" },
            file.file_id,
            format_file_size(file.file_size),
            file.download_count
        ));
    }
    text
}

pub fn user_stats(stats: Option<&UserStats>) -> String {
    match stats {
        Some(stats) => format!(
            "📊 Your statistics\n\n\
             📤 Uploads: {}\n\
             📥 Downloads: {}\n\
             💾 Storage used: {}\n\
             🕒 Last activity: {}",
            stats.total_uploads,
            stats.total_downloads,
            format_file_size(stats.storage_used),
            stats.last_activity.format("%Y-%m-%d %H:%M UTC")
        ),
        None => "📊 No activity recorded yet.".to_string(),
    }
}

pub fn file_stats(stats: &FileStats) -> String {
    let mut text = format!(
        "📊 Storage statistics\n\n\
         📁 Total files: {}\n\
         💾 Total size: {}",
        stats.total_files,
        format_file_size(stats.total_size)
    );
    if !stats.file_types.is_empty() {
        text.push_str("\n\nBy type:");
        for (file_type, count) in &stats.file_types {
            text.push_str(&format!("\n• {}: {}", file_type, count));
        }
    }
    text
}

pub fn short_link(record: &ShortUrlRecord) -> String {
    format!(
        "🔗 Short link created!\n\n{}\n\n↪️ {}",
        record.short_url, record.original_url
    )
}

pub fn shared_file_link(record: &ShortUrlRecord, total_links: usize) -> String {
    let mut text = short_link(record);
    if total_links > 1 {
        text.push_str(&format!("\n\n📎 This file now has {} short links.", total_links));
    }
    text
}

pub fn expanded_link(record: &ShortUrlRecord) -> String {
    let mut text = format!(
        "🔎 {}\n↪️ {}\n🕒 Created {}",
        record.short_url,
        record.original_url,
        record.created_date.format("%Y-%m-%d")
    );
    if let Some(file_id) = &record.file_id {
        text.push_str(&format!("\n📄 Stored file: {}", file_id));
    }
    text
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;
    use crate::domain::models::{file::FileKind, file_record::ChannelMessageRef};

    fn record() -> FileRecord {
        FileRecord {
            file_id: "LX1ABCDEFGHIJ".to_string(),
            filename: "report.pdf".to_string(),
            file_size: 2048,
            file_type: FileKind::Document,
            mime_type: Some("application/pdf".to_string()),
            message: ChannelMessageRef {
                channel_id: -100,
                message_id: 3,
            },
            user_id: Some(1),
            download_count: 4,
            is_private: true,
            is_deleted: false,
            google_drive_link: None,
            upload_date: Utc::now(),
        }
    }

    #[test]
    fn upload_reply_carries_both_retrieval_paths() {
        let receipt = UploadReceipt {
            record: record(),
            link: "https://t.me/vault_bot?start=LX1ABCDEFGHIJ".to_string(),
        };
        let text = upload_success(&receipt, Some("A PDF report."));
        assert!(text.contains("https://t.me/vault_bot?start=LX1ABCDEFGHIJ"));
        assert!(text.contains("/download LX1ABCDEFGHIJ"));
        assert!(text.contains("🔒"));
        assert!(text.ends_with("🤖 A PDF report."));
    }

    #[test]
    fn help_lists_only_enabled_integrations() {
        assert!(!help(false, false).contains("/ai"));
        assert!(!help(false, false).contains("/short"));
        assert!(help(true, true).contains("/ai analyze"));
    }

    #[test]
    fn share_reply_mentions_link_count_only_when_several() {
        let link = ShortUrlRecord {
            short_code: "abc".to_string(),
            short_url: "https://gplinks.co/abc".to_string(),
            original_url: "https://t.me/vault_bot?start=LX1ABCDEFGHIJ".to_string(),
            alias: None,
            user_id: Some(1),
            file_id: Some("LX1ABCDEFGHIJ".to_string()),
            created_date: Utc::now(),
        };
        assert!(!shared_file_link(&link, 1).contains("short links"));
        assert!(shared_file_link(&link, 3).contains("3 short links"));
    }

    #[test]
    fn listings_and_stats_render() {
        assert!(file_list(&[]).contains("haven't uploaded"));
        let listed = file_list(&[record()]);
        assert!(listed.contains("1. report.pdf 🔒"));
        assert!(listed.contains("📥 4"));

        let stats = FileStats {
            total_files: 2,
            total_size: 3072,
            file_types: BTreeMap::from([("document".to_string(), 2)]),
        };
        let text = file_stats(&stats);
        assert!(text.contains("3.0 KB"));
        assert!(text.contains("• document: 2"));
    }
}
