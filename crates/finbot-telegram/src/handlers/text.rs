use std::sync::Arc;

use teloxide::prelude::*;

use finbot_core::errors::GenerationError;

use crate::router::AppState;

/// Free-form text becomes an advice query: one unguarded generation attempt,
/// no rotation and no canned fallback. Failures surface as an error reply.
pub async fn handle_advice(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(query) = msg.text() else {
        return Ok(());
    };
    if query.trim().is_empty() {
        return Ok(());
    }

    let prompt =
        format!("You are a financial advisor. Provide financial advice for this user query: {query}");

    let reply = match state.generator.generate_once(&prompt).await {
        Ok(advice) => format!("📊 Financial Advice:\n\n{advice}"),
        Err(GenerationError::NoCredentials) => {
            "❌ No valid API keys available! Update your .env file.".to_string()
        }
        Err(e) => {
            tracing::warn!("advice generation failed: {e}");
            "❌ The advice service is currently unavailable. Please try again later.".to_string()
        }
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}
