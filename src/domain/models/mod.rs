pub mod ai_interaction;
pub mod file;
pub mod file_record;
pub mod identifier;
pub mod short_url;
pub mod user;
