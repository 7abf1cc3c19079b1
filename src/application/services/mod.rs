pub mod ai_service;
pub mod chat_assistant;
pub mod drive_service;
pub mod file_service;
pub mod link_service;
pub mod link_shortener;
pub mod storage_channel;

#[cfg(test)]
pub mod fakes;
