use std::time::Duration;

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardMarkup, MessageId};
use teloxide::{ApiError, RequestError};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::session::SessionEvent;

const NETWORK_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How long to wait before resending after `err`, if it is worth retrying
pub fn retry_delay(err: &RequestError) -> Option<Duration> {
    match err {
        RequestError::RetryAfter(seconds) => Some(seconds.duration()),
        RequestError::Network(_) => Some(NETWORK_RETRY_DELAY),
        _ => None,
    }
}

/// Send a message, retrying once on rate limiting and transient network errors
pub async fn send_with_retry(bot: &Bot, chat_id: ChatId, text: String) -> Result<(), RequestError> {
    let err = match bot.send_message(chat_id, text.clone()).await {
        Ok(_) => return Ok(()),
        Err(err) => err,
    };

    if let Some(delay) = retry_delay(&err) {
        warn!("Send to {chat_id} failed ({err}), retrying in {delay:?}");
        tokio::time::sleep(delay).await;
        bot.send_message(chat_id, text).await?;
        return Ok(());
    }

    match err {
        RequestError::Api(ApiError::BotBlocked) => {
            warn!("Bot was blocked by chat {chat_id}");
            Ok(())
        }
        err => {
            error!("Unexpected error sending message: {err}");
            Err(err)
        }
    }
}

/// Replace a menu message in place. Re-sending identical content is not an error.
pub async fn edit_menu(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
    markup: Option<InlineKeyboardMarkup>,
) -> Result<(), RequestError> {
    let request = bot.edit_message_text(chat_id, message_id, text);
    let result = match markup {
        Some(markup) => request.reply_markup(markup).await,
        None => request.await,
    };

    match result {
        Ok(_) => Ok(()),
        Err(RequestError::Api(ApiError::MessageNotModified)) => {
            debug!("Message {} in chat {} already up to date", message_id.0, chat_id);
            Ok(())
        }
        Err(err) => Err(err),
    }
}

/// Forward autotrade events from all sessions to their chats
pub async fn forward_session_events(bot: Bot, mut events: mpsc::UnboundedReceiver<SessionEvent>) {
    while let Some(event) = events.recv().await {
        let chat_id = ChatId(event.session);
        if let Err(err) = send_with_retry(&bot, chat_id, event.kind.text()).await {
            error!("Failed to deliver session update to {chat_id}: {err}");
        }
    }
    debug!("Session event stream closed");
}
