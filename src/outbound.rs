use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::requests::Requester;
use teloxide::types::{ChatId, MessageId, ParseMode, ReplyParameters};
use teloxide::Bot;
use tracing::warn;

/// Outbound messaging gateway.
///
/// Handlers and reply helpers talk to Telegram through this seam. Sends are
/// fire-and-forget: a failed delivery is logged, never propagated.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
        parse_mode: Option<ParseMode>,
    );

    async fn edit_message_text(&self, chat_id: ChatId, message_id: MessageId, text: &str);
}

#[async_trait]
impl Messenger for Bot {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
        parse_mode: Option<ParseMode>,
    ) {
        let mut request = Requester::send_message(self, chat_id, text.to_string());
        if let Some(message_id) = reply_to {
            request = request.reply_parameters(ReplyParameters::new(message_id));
        }
        if let Some(mode) = parse_mode {
            request = request.parse_mode(mode);
        }
        if let Err(err) = request.await {
            warn!("send_message to {chat_id} failed: {err}");
        }
    }

    async fn edit_message_text(&self, chat_id: ChatId, message_id: MessageId, text: &str) {
        if let Err(err) =
            Requester::edit_message_text(self, chat_id, message_id, text.to_string()).await
        {
            warn!("edit_message_text in {chat_id} failed: {err}");
        }
    }
}
