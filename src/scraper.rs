//! Web scraping module for page text extraction.
//!
//! Uses reqwest for fetching and scraper for HTML parsing. Extraction is
//! deliberately simple: all visible text on the page, whitespace-normalised.
//! No attempt is made to isolate the article body from navigation or
//! boilerplate; callers are expected to tolerate noisy input.

use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;
use thiserror::Error;

/// User-Agent string identifying this tool
pub(crate) const USER_AGENT: &str = concat!(
    "news-tldr/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/cladam/news-tldr)"
);

/// Default timeout for HTTP requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("no text content found at URL")]
    NoContent,
}

/// Create a configured HTTP client for scraping
pub(crate) fn create_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// Fetch the page at `url` and return its extracted plain text.
///
/// Non-2xx responses are fatal; there is no retry.
pub async fn fetch_page_text(url: &str) -> Result<String, ScrapeError> {
    let client = create_client()?;

    let response = client.get(url).send().await?.error_for_status()?;
    let html = response.text().await?;

    let text = extract_text(&html);
    if text.is_empty() {
        return Err(ScrapeError::NoContent);
    }

    Ok(text)
}

/// Extract all visible text from an HTML document.
///
/// Text nodes are visited in document order; text inside `script`, `style`
/// and `noscript` elements is skipped. Each line is trimmed, empty lines
/// are dropped, and the remainder is rejoined with single newlines.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
            });
            if hidden {
                continue;
            }
            raw.push_str(text);
            raw.push('\n');
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
