use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    #[default]
    General,
    FileAnalysis,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::General => "general",
            InteractionKind::FileAnalysis => "file_analysis",
        }
    }

    /// Unknown values read back from the database count as general.
    pub fn parse(value: &str) -> Self {
        match value {
            "file_analysis" => InteractionKind::FileAnalysis,
            _ => InteractionKind::General,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One question put to the AI assistant and the reply it got.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiInteraction {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub query: String,
    pub response: String,
    #[serde(rename = "interactionType")]
    pub interaction_type: InteractionKind,
    #[serde(rename = "createdDate")]
    pub created_date: DateTime<Utc>,
}
