use std::sync::Arc;

use teloxide::{prelude::*, types::ParseMode};

use finbot_core::{
    domain::LoanOutcome,
    loan::INVALID_FORMAT_REPLY,
    news::format_news,
};

use crate::router::AppState;

const WELCOME: &str = "👋 Welcome!\n\
Use /loan - for your loan approval calculations,\n\
/news - for the latest news for small businesses in India,\n\
or just ask any finance question.";

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub async fn handle_command(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let (cmd, rest) = parse_command(msg.text().unwrap_or(""));

    match cmd.as_str() {
        "start" => {
            bot.send_message(msg.chat.id, WELCOME).await?;
        }
        "loan" => handle_loan(&bot, &msg, &state, &rest).await?,
        "news" => handle_news(&bot, &msg, &state).await?,
        _ => {
            bot.send_message(msg.chat.id, "Unknown command. Try /start.")
                .await?;
        }
    }

    Ok(())
}

async fn handle_loan(
    bot: &Bot,
    msg: &Message,
    state: &Arc<AppState>,
    payload: &str,
) -> ResponseResult<()> {
    if payload.is_empty() {
        bot.send_message(msg.chat.id, INVALID_FORMAT_REPLY).await?;
        return Ok(());
    }

    tracing::info!("received loan application");
    let reply = match state.loan.process(payload).await {
        LoanOutcome::InvalidFormat => INVALID_FORMAT_REPLY.to_string(),
        LoanOutcome::Decided { reply, .. } => reply,
    };

    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

async fn handle_news(bot: &Bot, msg: &Message, state: &Arc<AppState>) -> ResponseResult<()> {
    let Some(news) = &state.news else {
        bot.send_message(msg.chat.id, "❌ SerpAPI key is missing! Update your .env file.")
            .await?;
        return Ok(());
    };

    let articles = match news.latest(&state.cfg.news_query, state.cfg.news_limit).await {
        Ok(articles) => articles,
        Err(e) => {
            tracing::warn!("news fetch failed: {e}");
            bot.send_message(msg.chat.id, "❌ Failed to fetch fintech news.")
                .await?;
            return Ok(());
        }
    };

    if articles.is_empty() {
        bot.send_message(msg.chat.id, "🚫 No recent fintech news found. Try again later.")
            .await?;
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        format!("📰 Latest Fintech News:\n\n{}", format_news(&articles)),
    )
    .parse_mode(ParseMode::Markdown)
    .await?;

    Ok(())
}
