use teloxide::prelude::*;

use crate::adapters::{controllers::command_controller::touch_sender, state::AppState};

const UNKNOWN_COMMAND: &str = "Unknown command. Use /help to see what I can do.";

#[derive(Debug, PartialEq)]
pub enum TextMessage {
    Question,
    UnknownCommand,
    /// A command meant for another bot, or an unaddressed one in a group.
    Ignored,
}

impl TextMessage {
    pub fn classify(text: &str, private_chat: bool, bot_username: &str) -> Self {
        let Some(command) = text.strip_prefix('/') else {
            return TextMessage::Question;
        };

        let name = command.split_whitespace().next().unwrap_or_default();
        match name.split_once('@') {
            Some((_, mention)) if mention.eq_ignore_ascii_case(bot_username) => {
                TextMessage::UnknownCommand
            }
            Some(_) => TextMessage::Ignored,
            None if private_chat => TextMessage::UnknownCommand,
            None => TextMessage::Ignored,
        }
    }
}

pub struct ChatController;

impl ChatController {
    /// Free text that is not a command goes to the AI assistant.
    pub async fn handle(bot: Bot, msg: Message, text: String, state: AppState) -> ResponseResult<()> {
        let kind = TextMessage::classify(&text, msg.chat.is_private(), &state.bot_username);
        if kind == TextMessage::Ignored {
            return Ok(());
        }

        let Some(profile) = touch_sender(&state, &msg).await else {
            return Ok(());
        };
        if kind == TextMessage::UnknownCommand {
            bot.send_message(msg.chat.id, UNKNOWN_COMMAND).await?;
            return Ok(());
        }

        let reply = state
            .chat_assistant
            .ask(&text, None, profile.user_id)
            .await;
        bot.send_message(msg.chat.id, reply).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question_everywhere() {
        assert_eq!(
            TextMessage::classify("what is rust?", false, "vault_bot"),
            TextMessage::Question
        );
        assert_eq!(
            TextMessage::classify("hi /there", true, "vault_bot"),
            TextMessage::Question
        );
    }

    #[test]
    fn unknown_commands_are_answered_only_when_addressed_to_us() {
        assert_eq!(
            TextMessage::classify("/frobnicate", true, "vault_bot"),
            TextMessage::UnknownCommand
        );
        assert_eq!(
            TextMessage::classify("/frobnicate@Vault_Bot now", false, "vault_bot"),
            TextMessage::UnknownCommand
        );
        assert_eq!(
            TextMessage::classify("/frobnicate", false, "vault_bot"),
            TextMessage::Ignored
        );
        assert_eq!(
            TextMessage::classify("/start@other_bot", true, "vault_bot"),
            TextMessage::Ignored
        );
    }
}
