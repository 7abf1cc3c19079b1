use teloxide::{prelude::*, types::User, utils::command::BotCommands};
use tracing::{info, warn};

use crate::{
    adapters::{controllers::replies, state::AppState},
    domain::models::user::UserProfile,
};

const MY_FILES_LIMIT: u32 = 10;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "start the bot or open a shared file")]
    Start(String),
    #[command(description = "show the command list")]
    Help,
    #[command(description = "how to upload a file")]
    Upload,
    #[command(description = "get a stored file")]
    Download(String),
    #[command(description = "delete one of your files")]
    Delete(String),
    #[command(description = "your most recent files")]
    MyFiles,
    #[command(description = "your upload and download counters")]
    MyStats,
    #[command(description = "storage statistics")]
    Stats,
    #[command(description = "shorten a URL: /short <url> [alias]")]
    Short(String),
    #[command(description = "short link for a stored file")]
    ShareLink(String),
    #[command(description = "show where a short link points")]
    Expand(String),
    #[command(description = "ask the AI assistant")]
    Ai(String),
}

/// What `/ai` was asked to do.
#[derive(Debug, PartialEq)]
pub enum AiRequest<'a> {
    Ask(&'a str),
    Analyze {
        file_id: &'a str,
        question: Option<&'a str>,
    },
}

impl<'a> AiRequest<'a> {
    pub fn parse(args: &'a str) -> Option<Self> {
        let args = args.trim();
        if args.is_empty() {
            return None;
        }

        let mut words = args.splitn(2, char::is_whitespace);
        if words.next() == Some("analyze") {
            let rest = words.next()?.trim();
            let mut parts = rest.splitn(2, char::is_whitespace);
            let file_id = parts.next().filter(|id| !id.is_empty())?;
            let question = parts.next().map(str::trim).filter(|q| !q.is_empty());
            return Some(AiRequest::Analyze { file_id, question });
        }

        Some(AiRequest::Ask(args))
    }
}

pub fn user_profile(user: &User) -> UserProfile {
    UserProfile {
        user_id: user.id.0 as i64,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()),
    }
}

/// Records the sender's activity; stats failures never block a reply.
pub async fn touch_sender(state: &AppState, msg: &Message) -> Option<UserProfile> {
    let profile = msg.from.as_ref().map(user_profile)?;
    if let Err(e) = state.user_repository.touch_user(&profile).await {
        warn!("Could not record activity of user {}: {}", profile.user_id, e);
    }
    Some(profile)
}

fn first_arg(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

pub struct CommandController;

impl CommandController {
    pub async fn handle(bot: Bot, msg: Message, cmd: Command, state: AppState) -> ResponseResult<()> {
        let Some(profile) = touch_sender(&state, &msg).await else {
            return Ok(());
        };
        let user_id = profile.user_id;
        info!("User {} issued {:?}", user_id, cmd);

        match cmd {
            Command::Start(args) => match first_arg(&args) {
                Some(file_id) => Self::download(&bot, &msg, &state, file_id, user_id).await?,
                None => {
                    let text = replies::welcome(
                        profile.first_name.as_deref(),
                        state.settings.max_file_size,
                    );
                    bot.send_message(msg.chat.id, text).await?;
                }
            },
            Command::Help => {
                let text = replies::help(
                    state.integrations.ai,
                    state.integrations.url_shortener,
                );
                bot.send_message(msg.chat.id, text).await?;
            }
            Command::Upload => {
                bot.send_message(msg.chat.id, replies::UPLOAD_INSTRUCTIONS)
                    .await?;
            }
            Command::Download(args) => match first_arg(&args) {
                Some(file_id) => Self::download(&bot, &msg, &state, file_id, user_id).await?,
                None => {
                    bot.send_message(msg.chat.id, "Usage: /download <file_id>")
                        .await?;
                }
            },
            Command::Delete(args) => {
                let Some(file_id) = first_arg(&args) else {
                    bot.send_message(msg.chat.id, "Usage: /delete <file_id>").await?;
                    return Ok(());
                };
                let reply = match state.file_service.delete(file_id, user_id).await {
                    Ok(record) => format!("🗑️ Deleted {} ({})", record.filename, record.file_id),
                    Err(e) => {
                        e.log("Delete failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::MyFiles => {
                let reply = match state.file_service.list_files(user_id, MY_FILES_LIMIT).await {
                    Ok(files) => replies::file_list(&files),
                    Err(e) => {
                        e.log("Listing files failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::MyStats => {
                let reply = match state.user_repository.get_user_stats(user_id).await {
                    Ok(stats) => replies::user_stats(stats.as_ref()),
                    Err(e) => {
                        e.log("Loading user stats failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::Stats => {
                let reply = match state.file_service.stats().await {
                    Ok(stats) => replies::file_stats(&stats),
                    Err(e) => {
                        e.log("Loading file stats failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::Short(args) => {
                let mut words = args.split_whitespace();
                let Some(url) = words.next() else {
                    bot.send_message(msg.chat.id, "Usage: /short <url> [alias]")
                        .await?;
                    return Ok(());
                };
                let alias = words.next();
                let reply = match state
                    .link_service
                    .shorten(url, alias, Some(user_id), None)
                    .await
                {
                    Ok(record) => replies::short_link(&record),
                    Err(e) => {
                        e.log("Shortening failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::ShareLink(args) => {
                let Some(file_id) = first_arg(&args) else {
                    bot.send_message(msg.chat.id, "Usage: /sharelink <file_id>")
                        .await?;
                    return Ok(());
                };
                let reply = match state.link_service.share_file(file_id, user_id).await {
                    Ok(record) => {
                        let total = match state.link_service.links_for_file(file_id).await {
                            Ok(links) => links.len(),
                            Err(e) => {
                                warn!("Could not count links of {}: {}", file_id, e);
                                1
                            }
                        };
                        replies::shared_file_link(&record, total)
                    }
                    Err(e) => {
                        e.log("Sharing file link failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::Expand(args) => {
                let Some(code) = first_arg(&args) else {
                    bot.send_message(msg.chat.id, "Usage: /expand <code>").await?;
                    return Ok(());
                };
                let reply = match state.link_service.resolve(code).await {
                    Ok(record) => replies::expanded_link(&record),
                    Err(e) => {
                        e.log("Expanding link failed");
                        e.user_message()
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
            Command::Ai(args) => {
                let reply = match AiRequest::parse(&args) {
                    None => "Usage: /ai <question> or /ai analyze <file_id> [question]".to_string(),
                    Some(AiRequest::Ask(question)) => {
                        state.chat_assistant.ask(question, None, user_id).await
                    }
                    Some(AiRequest::Analyze { file_id, question }) => {
                        let question = question.unwrap_or(
                            "Describe this file and suggest what I can do with it.",
                        );
                        state
                            .chat_assistant
                            .ask(question, Some(file_id), user_id)
                            .await
                    }
                };
                bot.send_message(msg.chat.id, reply).await?;
            }
        }

        Ok(())
    }

    async fn download(
        bot: &Bot,
        msg: &Message,
        state: &AppState,
        file_id: &str,
        user_id: i64,
    ) -> ResponseResult<()> {
        if let Err(e) = state
            .file_service
            .retrieve(file_id, user_id, msg.chat.id.0)
            .await
        {
            e.log("Retrieval failed");
            bot.send_message(msg.chat.id, e.user_message()).await?;
        }
        Ok(())
    }
}
