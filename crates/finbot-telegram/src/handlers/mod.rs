//! Telegram update handlers.
//!
//! Commands (`/start`, `/news`, `/loan`) go to `commands`; any other text is
//! treated as a free-form advice question. Non-text updates are ignored.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

mod commands;
mod text;

pub async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(message_text) = msg.text() else {
        return Ok(());
    };

    if message_text.starts_with('/') {
        return commands::handle_command(bot, msg, state).await;
    }

    text::handle_advice(bot, msg, state).await
}
