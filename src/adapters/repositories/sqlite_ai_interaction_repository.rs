use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};

use crate::{
    application::{
        dto::ai_interaction_dto::AiInteractionDTO, error::ApplicationError,
        repositories::ai_interaction_repository::AiInteractionRepository,
    },
    domain::models::ai_interaction::AiInteraction,
};

pub struct SqliteAiInteractionRepository {
    pool: SqlitePool,
}

impl SqliteAiInteractionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AiInteractionRepository for SqliteAiInteractionRepository {
    async fn log_interaction(
        &self,
        interaction: AiInteractionDTO,
    ) -> Result<AiInteraction, ApplicationError> {
        let query = r#"
            INSERT INTO ai_interactions (user_id, query, response, interaction_type, created_date)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
        "#;

        let new_interaction: AiInteraction = interaction.into();

        let created: AiInteractionDTO = query_as::<_, AiInteractionDTO>(query)
            .bind(new_interaction.user_id)
            .bind(&new_interaction.query)
            .bind(&new_interaction.response)
            .bind(new_interaction.interaction_type.as_str())
            .bind(new_interaction.created_date)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| ApplicationError::DatabaseError(e.to_string()))?;

        Ok(created.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::repositories::test_pool, domain::models::ai_interaction::InteractionKind};

    #[tokio::test]
    async fn interactions_are_stored_with_their_kind() {
        let (_dir, pool) = test_pool().await;
        let repo = SqliteAiInteractionRepository::new(pool.clone());

        let logged = repo
            .log_interaction(AiInteractionDTO {
                user_id: 7,
                query: Some("what is in this file?".to_string()),
                response: Some("a thesis".to_string()),
                interaction_type: Some(InteractionKind::FileAnalysis),
                ..AiInteractionDTO::default()
            })
            .await
            .unwrap();
        assert_eq!(logged.user_id, 7);
        assert_eq!(logged.interaction_type, InteractionKind::FileAnalysis);

        repo.log_interaction(AiInteractionDTO {
            user_id: 7,
            query: Some("hello".to_string()),
            response: Some("hi".to_string()),
            ..AiInteractionDTO::default()
        })
        .await
        .unwrap();

        let kinds: Vec<String> = sqlx::query_scalar(
            "SELECT interaction_type FROM ai_interactions WHERE user_id = ? ORDER BY id",
        )
        .bind(7_i64)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(kinds, vec!["file_analysis", "general"]);
    }
}
