use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::InlineKeyboard,
    Result,
};

/// Transport port.
///
/// Telegram is the first implementation; the shape is small enough that a
/// future adapter only needs plain text, inline keyboards, and callback
/// acknowledgement.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    async fn send_menu(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_menu(&self, msg: MessageRef, text: &str, keyboard: InlineKeyboard)
        -> Result<()>;

    /// Acknowledges a callback query, optionally with a toast (`show_alert`
    /// false) or a modal alert (`show_alert` true).
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;
}
