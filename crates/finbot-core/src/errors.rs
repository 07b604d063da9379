/// Core error type for the bot.
///
/// Adapter crates (Gemini, SerpAPI, SMTP, Telegram) map their specific errors
/// into this type so the bot core can handle failures consistently
/// (user-facing message vs retryable).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid loan application format")]
    InvalidFormat,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("mail error: {0}")]
    Mail(String),

    #[error("search error: {0}")]
    Search(String),
}

/// Failure tags for a single generation attempt.
///
/// The retry loop treats every tag identically (rotate and try the next
/// credential); the tags exist so logs and tests can tell a quota hit from a
/// network hiccup.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transient generation failure: {0}")]
    Transient(String),

    #[error("credential quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("no generation credentials configured")]
    NoCredentials,
}

pub type Result<T> = std::result::Result<T, Error>;
