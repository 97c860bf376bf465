pub mod access;
pub mod create_folder;
pub mod help;
pub mod responses;

use teloxide::types::{ChatId, Message, MessageId};
use tracing::error;

use crate::outbound::Messenger;
use crate::store::UserStore;

/// Command keywords, as typed by users. The help text interpolates these,
/// so renaming a command here renames it everywhere.
pub mod names {
    pub const START: &str = "/start";
    pub const HELP: &str = "/help";
    pub const ABOUT: &str = "/about";
    pub const CREATE_FOLDER: &str = "/create_folder";
    pub const YD_AUTH: &str = "/yd_auth";
    pub const YD_REVOKE: &str = "/yd_revoke";
}

/// Request-scoped data resolved once per incoming message and passed
/// explicitly into every handler.
pub struct RequestContext {
    pub user_id: u64,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub private_chat: bool,
    /// Everything after the command keyword, trimmed.
    pub argument: String,
}

/// Effective message text. Telegram delivers a command sent together with
/// an attachment in `caption` instead of `text`.
pub fn message_text(message: &Message) -> Option<&str> {
    message.text().or_else(|| message.caption())
}

/// Splits `/command@BotName arg…` into the bare command and its argument.
/// Returns `None` for anything that isn't a command.
pub fn parse_command(text: &str) -> Option<(&str, &str)> {
    let text = text.trim();
    if !text.starts_with('/') {
        return None;
    }

    let (head, argument) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };
    let command = match head.split_once('@') {
        Some((command, _bot_name)) => command,
        None => head,
    };

    Some((command, argument))
}

/// Token-required guard. Resolves the stored Yandex.Disk access token for
/// the user; on a missing token replies with an authorize-first hint, on a
/// store failure cancels. The caller proceeds only on `Some`.
pub async fn require_access_token<M: Messenger>(
    m: &M,
    users: &UserStore,
    ctx: &RequestContext,
) -> Option<String> {
    match users.access_token(ctx.user_id).await {
        Ok(Some(token)) => Some(token),
        Ok(None) => {
            let text = format!(
                "I don't have access to your Yandex.Disk. Grant it with {} first.",
                names::YD_AUTH
            );
            m.send_message(ctx.chat_id, &text, None, None).await;
            None
        }
        Err(err) => {
            error!("Failed to load access token: {err:#}");
            responses::cancel(m, ctx.chat_id, None, None).await;
            None
        }
    }
}
