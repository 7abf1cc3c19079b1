pub mod ai_interaction_repository;
pub mod file_repository;
pub mod short_url_repository;
pub mod user_repository;
