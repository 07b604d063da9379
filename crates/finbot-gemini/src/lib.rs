//! Gemini adapter (text generation).
//!
//! Implements the `TextGenerator` port against the `generateContent` REST
//! endpoint. The credential is passed per call; there is no ambient
//! configured identity, so rotating the pool is all it takes to switch keys.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use finbot_core::{
    domain::Credential,
    errors::GenerationError,
    generation::TextGenerator,
};

const GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client build");
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        credential: &Credential,
        prompt: &str,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/{GEMINI_MODEL}:generateContent?key={}",
            self.base_url,
            credential.secret()
        );

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 1024,
            },
        };

        tracing::debug!("calling Gemini with credential ..{}", credential.tail());

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transient(format!("gemini request error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Transient(format!("gemini json error: {e}")))?;

        // A well-formed but empty reply is returned as-is; the retry layer
        // treats empty text as a failed attempt.
        Ok(extract_text(&parsed))
    }
}

/// HTTP 429 and quota-tagged bodies mean this key's quota is gone; everything
/// else is treated as transient. The retry loop rotates on both anyway.
fn classify_failure(status: u16, body: &str) -> GenerationError {
    let snippet: String = body.chars().take(200).collect();
    if status == 429 || body.contains("RESOURCE_EXHAUSTED") {
        GenerationError::QuotaExhausted(format!("gemini {status}: {snippet}"))
    } else {
        GenerationError::Transient(format!("gemini {status}: {snippet}"))
    }
}

fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.clone())
        .unwrap_or_default()
}

// ============== Wire types ==============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_text_from_first_candidate() {
        let raw = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [{"text": "Here is your answer."}],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ],
            "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5}
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(&parsed), "Here is your answer.");
    }

    #[test]
    fn missing_candidates_extracts_empty_text() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(extract_text(&parsed), "");
    }

    #[test]
    fn rate_limit_status_maps_to_quota_exhausted() {
        match classify_failure(429, "slow down") {
            GenerationError::QuotaExhausted(_) => {}
            other => panic!("expected QuotaExhausted, got {other:?}"),
        }
    }

    #[test]
    fn quota_tagged_body_maps_to_quota_exhausted() {
        let body = r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#;
        match classify_failure(403, body) {
            GenerationError::QuotaExhausted(_) => {}
            other => panic!("expected QuotaExhausted, got {other:?}"),
        }
    }

    #[test]
    fn other_statuses_map_to_transient() {
        match classify_failure(500, "internal") {
            GenerationError::Transient(_) => {}
            other => panic!("expected Transient, got {other:?}"),
        }
    }

    #[test]
    fn request_serializes_with_camel_case_config() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.3,
                max_output_tokens: 1024,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
