use std::sync::Arc;

use finbot_core::{
    classifier::LogisticModel,
    config::Config,
    credentials::CredentialPool,
    generation::ResilientGenerator,
    loan::LoanWorkflow,
    mail::{DisabledMailer, Mailer},
    news::NewsProvider,
};
use finbot_gemini::GeminiClient;
use finbot_mail::SmtpMailer;
use finbot_search::SerpApiClient;
use finbot_telegram::router::{run_polling, AppState};

#[tokio::main]
async fn main() -> Result<(), finbot_core::Error> {
    finbot_core::logging::init("finbot")?;

    let cfg = Arc::new(Config::load()?);

    // The classifier is assumed always available once loaded; a bad model
    // file aborts startup.
    let classifier = Arc::new(LogisticModel::load(&cfg.model_path)?);

    if cfg.gemini_credentials.is_empty() {
        tracing::warn!("no Gemini API keys configured; generation degrades to fallback replies");
    }
    let pool = CredentialPool::new(cfg.gemini_credentials.clone());
    let generator = Arc::new(ResilientGenerator::new(
        Arc::new(GeminiClient::new(cfg.generation_timeout)),
        pool,
    ));

    let mailer: Arc<dyn Mailer> = match (&cfg.mail_user, &cfg.mail_password) {
        (Some(user), Some(password)) => Arc::new(SmtpMailer::new(
            &cfg.smtp_host,
            cfg.smtp_port,
            user,
            password,
        )?),
        _ => {
            tracing::warn!("mail credentials not configured; outcome emails will not be delivered");
            Arc::new(DisabledMailer)
        }
    };

    let news: Option<Arc<dyn NewsProvider>> = cfg
        .serpapi_key
        .as_ref()
        .map(|key| Arc::new(SerpApiClient::new(key.clone())) as Arc<dyn NewsProvider>);

    let loan = Arc::new(LoanWorkflow::new(classifier, generator.clone(), mailer));

    let state = Arc::new(AppState {
        cfg,
        loan,
        generator,
        news,
    });

    run_polling(state)
        .await
        .map_err(|e| finbot_core::Error::Config(format!("telegram bot failed: {e}")))?;

    Ok(())
}
