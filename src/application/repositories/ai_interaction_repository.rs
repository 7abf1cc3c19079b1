use async_trait::async_trait;

use crate::{
    application::{dto::ai_interaction_dto::AiInteractionDTO, error::ApplicationError},
    domain::models::ai_interaction::AiInteraction,
};

#[async_trait]
pub trait AiInteractionRepository: Send + Sync {
    async fn log_interaction(
        &self,
        interaction: AiInteractionDTO,
    ) -> Result<AiInteraction, ApplicationError>;
}
