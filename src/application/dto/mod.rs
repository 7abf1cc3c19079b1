pub mod ai_interaction_dto;
pub mod file_record_dto;
pub mod short_url_dto;
pub mod user_dto;
