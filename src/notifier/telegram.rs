use teloxide::prelude::*;
use teloxide::types::ChatId;

use super::{DispatchError, Dispatcher};

#[derive(Clone)]
pub struct TelegramDispatcher {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramDispatcher {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

impl Dispatcher for TelegramDispatcher {
    async fn send(&self, text: &str) -> Result<(), DispatchError> {
        self.bot.send_message(self.chat_id, text).await?;
        Ok(())
    }
}
