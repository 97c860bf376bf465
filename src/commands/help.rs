use teloxide::types::ParseMode;

use crate::commands::{names, RequestContext};
use crate::config::Config;
use crate::outbound::Messenger;

const ABOUT_TEXT: &str = "I am a bridge between Telegram and Yandex.Disk: \
     I turn your chat commands into Disk API calls. \
     I keep one access token per user and nothing else. \
     Send /help to see what I can do.";

/// Handles `/help` (and `/start`).
pub async fn handle<M: Messenger>(m: &M, config: &Config, ctx: &RequestContext) {
    m.send_message(ctx.chat_id, &help_text(config), None, Some(ParseMode::Html))
        .await;
}

/// Handles `/about`.
pub async fn about<M: Messenger>(m: &M, ctx: &RequestContext) {
    m.send_message(ctx.chat_id, ABOUT_TEXT, None, None).await;
}

/// Static help text enumerating every command the bot answers.
pub fn help_text(config: &Config) -> String {
    format!(
        "I can help you to interact with Yandex.Disk. \
         You can control me by sending these commands:\
         \n\n\
         <b>Yandex.Disk</b>\
         \n\
         By default \"<code>{folder}</code>\" folder is used.\
         \n\
         {create_folder} — creates a folder. \
         Send folder name with this command. \
         Folder name should starts from root, \
         nested folders should be separated with \"<code>/</code>\" character.\
         \n\n\
         <b>Yandex.Disk Access</b>\
         \n\
         {yd_auth} — give me an access to your Yandex.Disk\
         \n\
         {yd_revoke} — revoke my access to your Yandex.Disk\
         \n\n\
         <b>Information</b>\
         \n\
         {about} — read about me",
        folder = config.yandex.default_upload_folder,
        create_folder = names::CREATE_FOLDER,
        yd_auth = names::YD_AUTH,
        yd_revoke = names::YD_REVOKE,
        about = names::ABOUT,
    )
}
