//! Article body extraction.
//!
//! Downloads an article page and keeps the text of its first `max_paragraphs`
//! `<p>` elements, in document order, joined by single spaces.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("static selector"));

/// Fetches article pages and pulls out their paragraph text.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: Client,
    max_paragraphs: usize,
}

impl ContentExtractor {
    /// `client` carries the request timeout; it is shared with the feed fetcher.
    pub fn new(client: Client, max_paragraphs: usize) -> Self {
        Self {
            client,
            max_paragraphs,
        }
    }

    /// Download `url` once and extract its paragraph text.
    ///
    /// The HTTP status is not inspected: an error page is parsed like any
    /// other page.
    ///
    /// # Arguments
    ///
    /// * `url` - Absolute article URL
    ///
    /// # Returns
    ///
    /// The text of the first `max_paragraphs` `<p>` elements joined by single
    /// spaces (empty when the page has none), or a [`FetchError`] for an
    /// invalid URL, a network failure, a timeout or an undecodable body.
    #[instrument(level = "info", skip(self))]
    pub async fn extract(&self, url: &str) -> Result<String, FetchError> {
        let t0 = Instant::now();
        let parsed = Url::parse(url)?;

        let body = match self.client.get(parsed).send().await {
            Ok(response) => response.text().await?,
            Err(e) => {
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "Article fetch failed");
                return Err(e.into());
            }
        };

        let content = paragraph_text(&body, self.max_paragraphs);
        info!(
            bytes = content.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Extracted article text"
        );
        debug!(preview = %truncate_for_log(&content, 200), "Article text");
        Ok(content)
    }
}

/// Text of the first `limit` paragraphs of an HTML document.
pub fn paragraph_text(html: &str, limit: usize) -> String {
    let document = Html::parse_document(html);
    document
        .select(&PARAGRAPH_SELECTOR)
        .take(limit)
        .map(|p| p.text().collect::<String>())
        .join(" ")
}
