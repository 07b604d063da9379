//! SerpAPI adapter (news search).
//!
//! Implements the `NewsProvider` port with a Google News search
//! (`tbm=nws`). Missing result fields get user-presentable defaults.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use finbot_core::{domain::NewsArticle, errors::Error, news::NewsProvider, Result};

const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

#[derive(Clone, Debug)]
pub struct SerpApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client build");
        Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl NewsProvider for SerpApiClient {
    async fn latest(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("api_key", &self.api_key),
                ("tbm", "nws"),
                ("num", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Search(format!("serpapi request error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "serpapi failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("serpapi json error: {e}")))?;

        tracing::debug!("serpapi returned {} news results", parsed.news_results.len());
        Ok(to_articles(parsed, limit))
    }
}

fn to_articles(response: SearchResponse, limit: usize) -> Vec<NewsArticle> {
    response
        .news_results
        .into_iter()
        .take(limit)
        .map(|r| NewsArticle {
            title: r.title.unwrap_or_else(|| "No Title".to_string()),
            snippet: r
                .snippet
                .unwrap_or_else(|| "No description available.".to_string()),
            link: r.link.unwrap_or_else(|| "#".to_string()),
        })
        .collect()
}

// ============== Wire types ==============

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    news_results: Vec<NewsResult>,
}

#[derive(Debug, Deserialize)]
struct NewsResult {
    title: Option<String>,
    snippet: Option<String>,
    link: Option<String>,
}
