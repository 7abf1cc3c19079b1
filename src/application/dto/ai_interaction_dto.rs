use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::ai_interaction::{AiInteraction, InteractionKind};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AiInteractionDTO {
    pub user_id: i64,
    pub query: Option<String>,
    pub response: Option<String>,
    pub interaction_type: Option<InteractionKind>,
    pub created_date: Option<DateTime<Utc>>,
}

impl From<AiInteraction> for AiInteractionDTO {
    fn from(value: AiInteraction) -> Self {
        AiInteractionDTO {
            user_id: value.user_id,
            query: Some(value.query),
            response: Some(value.response),
            interaction_type: Some(value.interaction_type),
            created_date: Some(value.created_date),
        }
    }
}

impl From<AiInteractionDTO> for AiInteraction {
    fn from(value: AiInteractionDTO) -> Self {
        AiInteraction {
            user_id: value.user_id,
            query: value.query.unwrap_or_default(),
            response: value.response.unwrap_or_default(),
            interaction_type: value.interaction_type.unwrap_or_default(),
            created_date: value.created_date.unwrap_or_else(Utc::now),
        }
    }
}
