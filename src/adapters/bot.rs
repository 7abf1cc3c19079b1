use teloxide::{dispatching::UpdateHandler, prelude::*, RequestError};
use tracing::info;

use crate::adapters::{
    controllers::{
        chat_controller::ChatController,
        command_controller::{Command, CommandController},
        upload_controller::UploadController,
    },
    state::AppState,
};

/// Commands first, then file uploads, then free text.
pub fn schema() -> UpdateHandler<RequestError> {
    Update::filter_message()
        .branch(
            teloxide::filter_command::<Command, _>().endpoint(CommandController::handle),
        )
        .branch(dptree::filter(UploadController::has_file).endpoint(UploadController::handle))
        .branch(Message::filter_text().endpoint(ChatController::handle))
}

pub async fn run(bot: Bot, state: AppState) {
    info!("Starting Telegram dispatcher as @{}", state.bot_username);

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
