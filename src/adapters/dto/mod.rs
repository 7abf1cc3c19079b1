mod ai_interaction_dto;
mod file_record_dto;
mod short_url_dto;
mod user_dto;
