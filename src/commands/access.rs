use teloxide::types::ChatId;
use tracing::error;

use crate::commands::{names, responses, RequestContext};
use crate::config::Config;
use crate::outbound::Messenger;
use crate::store::UserStore;

const AUTHORIZE_URL: &str = "https://oauth.yandex.ru/authorize";

/// Handles `/yd_auth`.
///
/// Without an argument sends the OAuth authorize link; with an argument
/// stores the pasted token. Both variants deal with the user's credential,
/// so they happen in a private chat only.
pub async fn auth<M: Messenger>(m: &M, users: &UserStore, config: &Config, ctx: &RequestContext) {
    if ctx.private_chat {
        if ctx.argument.is_empty() {
            m.send_message(ctx.chat_id, &authorize_text(config), None, None)
                .await;
        } else if ctx.argument.contains(char::is_whitespace) {
            // A token is a single opaque word; anything else is not
            // usable data for this command.
            responses::abort(m, ctx.chat_id, None, Some(ctx.message_id)).await;
        } else {
            match users.set_access_token(ctx.user_id, &ctx.argument).await {
                Ok(()) => {
                    let text = format!(
                        "Access granted. Now you can use {}.",
                        names::CREATE_FOLDER
                    );
                    m.send_message(ctx.chat_id, &text, None, None).await;
                }
                Err(err) => {
                    error!("Failed to store access token: {err:#}");
                    responses::cancel(m, ctx.chat_id, None, None).await;
                }
            }
        }
        return;
    }

    // Group chat. A pasted token is visible to everyone here; refuse it.
    if !ctx.argument.is_empty() {
        let text = format!(
            "Don't send me your token in a group chat — everyone here can see it. \
             Revoke it with {} and send me a new one in a private chat.",
            names::YD_REVOKE
        );
        m.send_message(ctx.chat_id, &text, Some(ctx.message_id), None)
            .await;
        return;
    }

    // The authorize link goes to the user's private chat, if one is known.
    match users.private_chat(ctx.user_id).await {
        Ok(Some(private_chat_id)) => {
            m.send_message(ChatId(private_chat_id), &authorize_text(config), None, None)
                .await;
        }
        Ok(None) => responses::request_private_chat(m, ctx.chat_id).await,
        Err(err) => {
            error!("Failed to look up private chat: {err:#}");
            responses::cancel(m, ctx.chat_id, None, None).await;
        }
    }
}

/// Handles `/yd_revoke`.
pub async fn revoke<M: Messenger>(m: &M, users: &UserStore, ctx: &RequestContext) {
    match users.clear_access_token(ctx.user_id).await {
        Ok(true) => {
            let text = format!(
                "Access revoked. You can grant it again with {}.",
                names::YD_AUTH
            );
            m.send_message(ctx.chat_id, &text, None, None).await;
        }
        Ok(false) => {
            m.send_message(ctx.chat_id, "I had no access to revoke.", None, None)
                .await;
        }
        Err(err) => {
            error!("Failed to revoke access token: {err:#}");
            responses::cancel(m, ctx.chat_id, None, None).await;
        }
    }
}

fn authorize_text(config: &Config) -> String {
    format!(
        "Open this link, allow the access and copy the token it shows:\
         \n\
         {url}?response_type=token&client_id={client_id}\
         \n\n\
         Then send me \"{cmd} <token>\" right here.",
        url = AUTHORIZE_URL,
        client_id = config.yandex.oauth_client_id,
        cmd = names::YD_AUTH,
    )
}
