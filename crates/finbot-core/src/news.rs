use async_trait::async_trait;

use crate::{domain::NewsArticle, Result};

/// Port for the news-search provider. The SerpAPI implementation lives in
/// `finbot-search`.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Latest news for `query`, at most `limit` results.
    async fn latest(&self, query: &str, limit: usize) -> Result<Vec<NewsArticle>>;
}

/// Render articles as Telegram Markdown: bullet, bold title, snippet, link.
pub fn format_news(articles: &[NewsArticle]) -> String {
    articles
        .iter()
        .map(|a| format!("🔹 *{}*\n{}\n[Read more]({})", a.title, a.snippet, a.link))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_each_article_as_a_bullet() {
        let articles = vec![
            NewsArticle {
                title: "UPI lending grows".to_string(),
                snippet: "Small businesses adopt UPI credit.".to_string(),
                link: "https://example.com/a".to_string(),
            },
            NewsArticle {
                title: "New MSME scheme".to_string(),
                snippet: "Government announces support.".to_string(),
                link: "https://example.com/b".to_string(),
            },
        ];

        let out = format_news(&articles);
        assert_eq!(
            out,
            "🔹 *UPI lending grows*\nSmall businesses adopt UPI credit.\n[Read more](https://example.com/a)\n\n🔹 *New MSME scheme*\nGovernment announces support.\n[Read more](https://example.com/b)"
        );
    }

    #[test]
    fn empty_list_formats_to_empty_string() {
        assert_eq!(format_news(&[]), "");
    }
}
