use teloxide::types::{ChatId, MessageId};

use crate::outbound::Messenger;

const ABORT_TEXT: &str =
    "I can't handle this because you didn't send any suitable data for that command.";

const CANCEL_TEXT: &str =
    "At the moment i can't process this because of my internal error. Try later please.";

const PRIVATE_CHAT_TEXT: &str = "I need to send you your secret information, \
     but i don't know any private chat with you. \
     First, contact me through private chat (direct message). \
     After that repeat your request.";

/// Exactly one outbound call per invocation: edit wins over reply-to,
/// reply-to wins over a plain send.
async fn notify<M: Messenger>(
    m: &M,
    chat_id: ChatId,
    text: &str,
    edit_message: Option<MessageId>,
    reply_to_message: Option<MessageId>,
) {
    if let Some(message_id) = edit_message {
        m.edit_message_text(chat_id, message_id, text).await;
    } else if let Some(message_id) = reply_to_message {
        m.send_message(chat_id, text, Some(message_id), None).await;
    } else {
        m.send_message(chat_id, text, None, None).await;
    }
}

/// Aborts command execution due to invalid message data.
/// Don't confuse with `cancel()`.
pub async fn abort<M: Messenger>(
    m: &M,
    chat_id: ChatId,
    edit_message: Option<MessageId>,
    reply_to_message: Option<MessageId>,
) {
    notify(m, chat_id, ABORT_TEXT, edit_message, reply_to_message).await;
}

/// Cancels command execution due to an internal error.
/// Don't confuse with `abort()`.
pub async fn cancel<M: Messenger>(
    m: &M,
    chat_id: ChatId,
    edit_message: Option<MessageId>,
    reply_to_message: Option<MessageId>,
) {
    notify(m, chat_id, CANCEL_TEXT, edit_message, reply_to_message).await;
}

/// Aborts command execution due to lack of a private chat with the user.
pub async fn request_private_chat<M: Messenger>(m: &M, chat_id: ChatId) {
    m.send_message(chat_id, PRIVATE_CHAT_TEXT, None, None).await;
}
