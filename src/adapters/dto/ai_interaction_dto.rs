use sqlx::{sqlite::SqliteRow, FromRow, Row};

use crate::{
    application::dto::ai_interaction_dto::AiInteractionDTO,
    domain::models::ai_interaction::InteractionKind,
};

impl FromRow<'_, SqliteRow> for AiInteractionDTO {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let interaction_type: String = row.try_get("interaction_type")?;
        Ok(AiInteractionDTO {
            user_id: row.try_get("user_id")?,
            query: Some(row.try_get("query")?),
            response: Some(row.try_get("response")?),
            interaction_type: Some(InteractionKind::parse(&interaction_type)),
            created_date: Some(row.try_get("created_date")?),
        })
    }
}
