pub mod chat_controller;
pub mod command_controller;
pub mod health_controller;
pub mod replies;
pub mod stats_controller;
pub mod upload_controller;
