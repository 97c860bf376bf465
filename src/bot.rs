use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

use crate::commands::{self, names, responses, RequestContext};
use crate::config::Config;
use crate::disk::DiskClient;
use crate::store::UserStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub disk: DiskClient,
    pub users: UserStore,
}

impl AppState {
    pub fn new(config: Config, users: UserStore) -> Self {
        let disk = DiskClient::new(&config.yandex);
        Self {
            config,
            disk,
            users,
        }
    }
}

/// Start the Telegram bot
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let bot = Bot::new(&state.config.telegram.bot_token);

    info!("Starting Telegram bot...");

    let allowed_users = state.config.telegram.allowed_user_ids.clone();

    let handler = Update::filter_message()
        .filter_map(move |msg: Message| {
            let user = msg.from.as_ref()?;
            if allowed_users.is_empty() || allowed_users.contains(&user.id.0) {
                Some(msg)
            } else {
                None
            }
        })
        .endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("bot"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let user_id = match msg.from.as_ref() {
        Some(user) => user.id.0,
        None => return Ok(()),
    };

    // Learn the user's private chat; `/yd_auth` from a group routes its
    // secret reply there.
    if msg.chat.is_private() {
        if let Err(err) = state.users.remember_private_chat(user_id, msg.chat.id.0).await {
            warn!("Failed to remember private chat: {err:#}");
        }
    }

    // A command next to an attachment arrives as a caption.
    let text = match commands::message_text(&msg) {
        Some(t) => t.to_string(),
        None => {
            responses::abort(&bot, msg.chat.id, None, Some(msg.id)).await;
            return Ok(());
        }
    };

    debug!("Message from user {}: {}", user_id, text);

    let Some((command, argument)) = commands::parse_command(&text) else {
        responses::abort(&bot, msg.chat.id, None, Some(msg.id)).await;
        return Ok(());
    };

    let ctx = RequestContext {
        user_id,
        chat_id: msg.chat.id,
        message_id: msg.id,
        private_chat: msg.chat.is_private(),
        argument: argument.to_string(),
    };

    match command {
        names::START | names::HELP => commands::help::handle(&bot, &state.config, &ctx).await,
        names::ABOUT => commands::help::about(&bot, &ctx).await,
        names::CREATE_FOLDER => {
            commands::create_folder::handle(&bot, &state.disk, &state.users, &ctx).await
        }
        names::YD_AUTH => commands::access::auth(&bot, &state.users, &state.config, &ctx).await,
        names::YD_REVOKE => commands::access::revoke(&bot, &state.users, &ctx).await,
        _ => responses::abort(&bot, msg.chat.id, None, Some(msg.id)).await,
    }

    Ok(())
}
