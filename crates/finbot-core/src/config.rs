use std::{
    env,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::Credential, errors::Error, Result};

/// Typed configuration for the bot, loaded from environment variables with an
/// optional `.env` file (existing env always wins).
#[derive(Clone, Debug)]
pub struct Config {
    // Core
    pub telegram_bot_token: String,

    // Generation service
    /// Ordered Gemini API keys. Zero keys is a valid, degraded state: every
    /// guarded generation call returns its fallback without touching the
    /// network.
    pub gemini_credentials: Vec<Credential>,
    pub generation_timeout: Duration,

    // Classifier
    pub model_path: PathBuf,

    // News search
    pub serpapi_key: Option<String>,
    pub news_query: String,
    pub news_limit: usize,

    // Outbound mail
    pub smtp_host: String,
    pub smtp_port: u16,
    pub mail_user: Option<String>,
    pub mail_password: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let gemini_credentials = load_gemini_credentials();
        let generation_timeout =
            Duration::from_millis(env_u64("GENERATION_TIMEOUT_MS").unwrap_or(30_000));

        let model_path = env_path("MODEL_PATH")
            .unwrap_or_else(|| PathBuf::from("logistic_model.json"));

        let serpapi_key = env_str("SERPAPI_KEY").and_then(non_empty);
        let news_query = env_str("NEWS_QUERY").and_then(non_empty).unwrap_or_else(|| {
            "latest fintech news related to small businesses in India".to_string()
        });
        let news_limit = env_usize("NEWS_LIMIT").unwrap_or(6);

        let smtp_host = env_str("SMTP_HOST")
            .and_then(non_empty)
            .unwrap_or_else(|| "smtp.gmail.com".to_string());
        let smtp_port = env_u16("SMTP_PORT").unwrap_or(587);
        let mail_user = env_str("GMAIL_USER").and_then(non_empty);
        let mail_password = env_str("GMAIL_PASSWORD").and_then(non_empty);

        Ok(Self {
            telegram_bot_token,
            gemini_credentials,
            generation_timeout,
            model_path,
            serpapi_key,
            news_query,
            news_limit,
            smtp_host,
            smtp_port,
            mail_user,
            mail_password,
        })
    }
}

/// Gemini keys come either as a `GEMINI_API_KEYS` CSV or as numbered
/// `GEMINI_API_KEY_1..=8` variables (the original deployment used the
/// numbered form). Order is preserved; blanks are skipped.
fn load_gemini_credentials() -> Vec<Credential> {
    let mut keys: Vec<String> = env_str("GEMINI_API_KEYS")
        .map(|csv| {
            csv.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    if keys.is_empty() {
        for n in 1..=8 {
            if let Some(key) = env_str(&format!("GEMINI_API_KEY_{n}")).and_then(non_empty) {
                keys.push(key);
            }
        }
    }

    keys.into_iter().map(Credential::new).collect()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_u16(key: &str) -> Option<u16> {
    env_str(key).and_then(|s| s.trim().parse::<u16>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
