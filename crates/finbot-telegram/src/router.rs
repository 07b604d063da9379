use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use finbot_core::{
    config::Config, generation::ResilientGenerator, loan::LoanWorkflow, news::NewsProvider,
};

use crate::handlers;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub loan: Arc<LoanWorkflow>,
    pub generator: Arc<ResilientGenerator>,
    /// `None` when no SerpAPI key is configured; `/news` then replies with an
    /// explicit error instead of calling out.
    pub news: Option<Arc<dyn NewsProvider>>,
}

pub async fn run_polling(state: Arc<AppState>) -> anyhow::Result<()> {
    let bot = Bot::new(state.cfg.telegram_bot_token.clone());

    if let Ok(me) = bot.get_me().await {
        tracing::info!("finbot started: @{}", me.username());
    }
    tracing::info!(
        "generation credentials: {}, news search: {}",
        state.cfg.gemini_credentials.len(),
        if state.news.is_some() { "enabled" } else { "disabled" },
    );

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
