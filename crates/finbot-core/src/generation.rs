use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    credentials::CredentialPool,
    domain::Credential,
    errors::GenerationError,
};

/// Port for the external text-generation service.
///
/// The call is stateless: the active credential is passed in explicitly
/// instead of being configured as ambient service state, so the pool's cursor
/// is the single source of truth for "which identity is active".
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> std::result::Result<String, GenerationError>;
}

/// Executes one logical "generate text" request against an unreliable
/// service, masking failures by rotating credentials.
///
/// Every failure tag is treated the same: rotate, retry, until each
/// credential in the pool has been tried once. No backoff, no delay, no
/// per-credential health tracking.
pub struct ResilientGenerator {
    client: Arc<dyn TextGenerator>,
    pool: Mutex<CredentialPool>,
}

impl ResilientGenerator {
    pub fn new(client: Arc<dyn TextGenerator>, pool: CredentialPool) -> Self {
        Self {
            client,
            pool: Mutex::new(pool),
        }
    }

    /// Attempt the call once per credential in the pool; return the first
    /// non-empty response, or `fallback` once the pool is exhausted.
    ///
    /// An empty pool returns the fallback immediately with zero external
    /// calls. An empty/whitespace response counts as a failed attempt and
    /// rotates the cursor like any error.
    pub async fn generate_or_fallback(&self, prompt: &str, fallback: &str) -> String {
        let attempts = self.pool.lock().await.len();
        if attempts == 0 {
            tracing::warn!("no generation credentials configured, returning fallback");
            return fallback.to_string();
        }

        for attempt in 1..=attempts {
            let credential = {
                let pool = self.pool.lock().await;
                match pool.current() {
                    Some(c) => c.clone(),
                    None => break,
                }
            };

            match self.client.generate(&credential, prompt).await {
                Ok(text) if !text.trim().is_empty() => return text.trim().to_string(),
                Ok(_) => {
                    tracing::warn!(
                        attempt,
                        "generation returned empty response on credential ..{}",
                        credential.tail()
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        "generation failed on credential ..{}: {e}",
                        credential.tail()
                    );
                }
            }

            self.pool.lock().await.advance();
        }

        tracing::warn!("all generation credentials exhausted, returning fallback");
        fallback.to_string()
    }

    /// Single attempt with the current credential: no rotation, no fallback.
    /// Used by the advice path, where failures surface to the user directly.
    pub async fn generate_once(
        &self,
        prompt: &str,
    ) -> std::result::Result<String, GenerationError> {
        let credential = {
            let pool = self.pool.lock().await;
            pool.current().cloned().ok_or(GenerationError::NoCredentials)?
        };
        self.client.generate(&credential, prompt).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Scripted fake: one outcome per expected attempt, recording which
    /// credential served each attempt.
    struct ScriptedGenerator {
        script: Vec<std::result::Result<String, &'static str>>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<std::result::Result<String, &'static str>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            credential: &Credential,
            _prompt: &str,
        ) -> std::result::Result<String, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().await.push(credential.secret().to_string());
            match self.script.get(n) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(msg)) => Err(GenerationError::Transient(msg.to_string())),
                None => panic!("more attempts than scripted"),
            }
        }
    }

    fn pool(keys: &[&str]) -> CredentialPool {
        CredentialPool::new(keys.iter().map(|k| Credential::new(*k)).collect())
    }

    #[tokio::test]
    async fn empty_pool_returns_fallback_without_calling_out() {
        let client = Arc::new(ScriptedGenerator::new(vec![]));
        let gen = ResilientGenerator::new(client.clone(), pool(&[]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "canned");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn success_on_first_attempt_short_circuits() {
        let client = Arc::new(ScriptedGenerator::new(vec![Ok("answer".to_string())]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2", "k3"]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "answer");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn rotates_once_per_failure_and_stops_on_success() {
        let client = Arc::new(ScriptedGenerator::new(vec![
            Err("boom"),
            Err("boom"),
            Ok("third time".to_string()),
        ]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2", "k3"]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "third time");
        assert_eq!(client.calls(), 3);
        assert_eq!(
            client.seen.lock().await.as_slice(),
            &["k1".to_string(), "k2".to_string(), "k3".to_string()]
        );
    }

    #[tokio::test]
    async fn at_most_pool_size_attempts_then_fallback() {
        let client = Arc::new(ScriptedGenerator::new(vec![
            Err("boom"),
            Err("boom"),
            Err("boom"),
        ]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2", "k3"]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "canned");
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn full_rotation_returns_cursor_to_start() {
        let client = Arc::new(ScriptedGenerator::new(vec![
            Err("boom"),
            Err("boom"),
            Err("boom"),
            Ok("recovered".to_string()),
        ]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2", "k3"]));

        assert_eq!(gen.generate_or_fallback("hello", "canned").await, "canned");
        // After N failed attempts the cursor has wrapped back to k1.
        assert_eq!(gen.generate_or_fallback("again", "canned").await, "recovered");
        assert_eq!(client.seen.lock().await.last().unwrap(), "k1");
    }

    #[tokio::test]
    async fn empty_response_counts_as_failure_and_rotates() {
        let client = Arc::new(ScriptedGenerator::new(vec![
            Ok("   ".to_string()),
            Ok("real answer".to_string()),
        ]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2"]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "real answer");
        assert_eq!(
            client.seen.lock().await.as_slice(),
            &["k1".to_string(), "k2".to_string()]
        );
    }

    #[tokio::test]
    async fn all_empty_responses_return_fallback() {
        let client = Arc::new(ScriptedGenerator::new(vec![
            Ok(String::new()),
            Ok(String::new()),
        ]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2"]));

        let out = gen.generate_or_fallback("hello", "canned").await;
        assert_eq!(out, "canned");
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn generate_once_does_not_rotate() {
        let client = Arc::new(ScriptedGenerator::new(vec![Err("boom"), Err("boom")]));
        let gen = ResilientGenerator::new(client.clone(), pool(&["k1", "k2"]));

        assert!(gen.generate_once("q").await.is_err());
        assert!(gen.generate_once("q").await.is_err());
        // Both attempts used the same credential.
        assert_eq!(
            client.seen.lock().await.as_slice(),
            &["k1".to_string(), "k1".to_string()]
        );
    }

    #[tokio::test]
    async fn generate_once_with_empty_pool_is_no_credentials() {
        let client = Arc::new(ScriptedGenerator::new(vec![]));
        let gen = ResilientGenerator::new(client.clone(), pool(&[]));

        match gen.generate_once("q").await {
            Err(GenerationError::NoCredentials) => {}
            other => panic!("expected NoCredentials, got {other:?}"),
        }
        assert_eq!(client.calls(), 0);
    }
}
