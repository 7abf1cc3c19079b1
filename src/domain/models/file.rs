use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Document,
    Photo,
    Video,
    Audio,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Document => "document",
            FileKind::Photo => "photo",
            FileKind::Video => "video",
            FileKind::Audio => "audio",
        }
    }

    /// Extension assumed when Telegram does not send a file name.
    pub fn default_extension(&self) -> &'static str {
        match self {
            FileKind::Document => "",
            FileKind::Photo => "jpg",
            FileKind::Video => "mp4",
            FileKind::Audio => "mp3",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(FileKind::Document),
            "photo" => Ok(FileKind::Photo),
            "video" => Ok(FileKind::Video),
            "audio" => Ok(FileKind::Audio),
            other => Err(format!("unknown file kind '{}'", other)),
        }
    }
}

/// A file as received from a chat, before it is relayed anywhere.
#[derive(Debug, Clone)]
pub struct InboundFile {
    /// Platform handle of the received file (Telegram `file_id`).
    pub source: String,
    pub file_name: Option<String>,
    pub size: u64,
    pub mime_type: Option<String>,
    pub kind: FileKind,
}

impl InboundFile {
    pub fn display_name(&self) -> String {
        match &self.file_name {
            Some(name) => clean_filename(name),
            None => {
                let short_source: String = self.source.chars().take(16).collect();
                let ext = self.kind.default_extension();
                if ext.is_empty() {
                    format!("{}_{}", self.kind, short_source)
                } else {
                    format!("{}_{}.{}", self.kind, short_source, ext)
                }
            }
        }
    }

    pub fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .map(file_extension)
            .filter(|ext| !ext.is_empty())
            .unwrap_or_else(|| self.kind.default_extension().to_string())
    }

    pub fn mime_or_default(&self) -> String {
        self.mime_type.clone().unwrap_or_else(|| match self.kind {
            FileKind::Photo => "image/jpeg".to_string(),
            _ => "application/octet-stream".to_string(),
        })
    }
}

/// Raw bytes plus the metadata needed to hand them to another store.
#[derive(Debug, Clone)]
pub struct FileData {
    pub content: Vec<u8>,
    pub filename: String,
    pub mime_type: String,
}

impl FileData {
    pub fn new(content: Vec<u8>, filename: String, mime_type: String) -> Self {
        Self {
            content,
            filename,
            mime_type,
        }
    }
}

pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

pub fn clean_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_matches(|c| c == '.' || c == ' ');

    if trimmed.chars().count() <= 255 {
        return if trimmed.is_empty() {
            "unnamed_file".to_string()
        } else {
            trimmed.to_string()
        };
    }

    match trimmed.rsplit_once('.') {
        Some((name, ext)) if ext.chars().count() < 250 => {
            let keep = 250 - ext.chars().count();
            let name: String = name.chars().take(keep).collect();
            format!("{}.{}", name, ext)
        }
        _ => trimmed.chars().take(255).collect(),
    }
}

pub fn format_file_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = size_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", size, UNITS[unit])
}
