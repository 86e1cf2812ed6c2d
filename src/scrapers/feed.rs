//! RSS/Atom feed reading.
//!
//! Each feed locator is either an `http(s)` URL or a path to a feed file on
//! disk. Feeds are read one after another; a feed that cannot be fetched or
//! parsed contributes no articles and does not stop the batch.

use crate::error::{FetchError, StageError};
use crate::models::Article;
use crate::scrapers::content::ContentExtractor;
use feed_rs::model::{Entry, Feed};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Reads feeds and scrapes the linked articles.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    extractor: ContentExtractor,
}

impl FeedFetcher {
    pub fn new(client: Client, extractor: ContentExtractor) -> Self {
        Self { client, extractor }
    }

    /// Read every feed in order and build an [`Article`] for each of the first
    /// `limit` entries of each feed.
    ///
    /// # Arguments
    ///
    /// * `feeds` - Feed URLs or local feed paths, read in this order
    /// * `limit` - Entries taken from the top of each feed
    ///
    /// # Returns
    ///
    /// At most `feeds.len() * limit` articles, grouped by feed in input order,
    /// entries in feed order. Feeds that fail are skipped; articles whose page
    /// failed carry the error in `content`.
    #[instrument(level = "info", skip_all, fields(feeds = feeds.len(), limit = limit))]
    pub async fn fetch_articles(&self, feeds: &[String], limit: usize) -> Vec<Article> {
        let mut articles = Vec::new();

        for locator in feeds {
            let feed = match self.load_feed(locator).await {
                Ok(feed) => feed,
                Err(e) => {
                    warn!(feed = %locator, error = %e, "Feed unavailable; skipping");
                    continue;
                }
            };
            info!(feed = %locator, entries = feed.entries.len(), "Parsed feed");

            for entry in feed.entries.into_iter().take(limit) {
                let Some((title, link)) = entry_title_and_link(entry) else {
                    warn!(feed = %locator, "Entry has no link; skipping");
                    continue;
                };
                let content = self.extractor.extract(&link).await.map_err(StageError::from);
                debug!(%link, ok = content.is_ok(), "Built article");
                articles.push(Article {
                    title,
                    link,
                    content,
                });
            }
        }

        info!(count = articles.len(), "Fetched articles");
        articles
    }

    /// Fetch or read one feed and parse it.
    #[instrument(level = "debug", skip(self))]
    pub async fn load_feed(&self, locator: &str) -> Result<Feed, FetchError> {
        let bytes = match Url::parse(locator) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                self.client.get(url).send().await?.bytes().await?.to_vec()
            }
            Ok(url) if url.scheme() == "file" => {
                let path = url.to_file_path().map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a local file url")
                })?;
                tokio::fs::read(path).await?
            }
            _ => tokio::fs::read(locator).await?,
        };

        Ok(feed_rs::parser::parse(bytes.as_slice())?)
    }
}

/// Title (empty when absent) and first link of a feed entry.
fn entry_title_and_link(entry: Entry) -> Option<(String, String)> {
    let link = entry.links.into_iter().next()?.href;
    let title = entry.title.map(|t| t.content).unwrap_or_default();
    Some((title, link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn fetcher(max_paragraphs: usize) -> FeedFetcher {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        let extractor = ContentExtractor::new(client.clone(), max_paragraphs);
        FeedFetcher::new(client, extractor)
    }

    fn rss(items: &[(&str, String)]) -> String {
        let items: String = items
            .iter()
            .map(|(title, link)| format!("<item><title>{title}</title><link>{link}</link></item>"))
            .collect();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Test</title><link>http://example.com</link><description>d</description>{items}</channel></rss>"#
        )
    }

    async fn mount_article(server: &MockServer, route: &str, paragraphs: usize) {
        let body: String = (1..=paragraphs).map(|i| format!("<p>{route} {i}</p>")).collect();
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    async fn mount_feed(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(body)
                    .insert_header("Content-Type", "application/rss+xml"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_three_entries_limit_three() {
        let server = MockServer::start().await;
        for route in ["/a1", "/a2", "/a3"] {
            mount_article(&server, route, 30).await;
        }
        let base = server.uri();
        let feed = rss(&[
            ("First", format!("{base}/a1")),
            ("Second", format!("{base}/a2")),
            ("Third", format!("{base}/a3")),
        ]);
        mount_feed(&server, "/feed.xml", feed).await;

        let articles = fetcher(20)
            .fetch_articles(&[format!("{base}/feed.xml")], 3)
            .await;

        assert_eq!(articles.len(), 3);
        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        for article in &articles {
            assert!(!article.link.is_empty());
            let content = article.content.as_ref().unwrap();
            assert!(content.ends_with(" 20"));
            assert!(!content.contains(" 21"));
        }
    }

    #[tokio::test]
    async fn test_limit_and_feed_order() {
        let server = MockServer::start().await;
        for route in ["/x1", "/x2", "/x3", "/y1", "/y2"] {
            mount_article(&server, route, 2).await;
        }
        let base = server.uri();
        mount_feed(
            &server,
            "/x.xml",
            rss(&[
                ("x1", format!("{base}/x1")),
                ("x2", format!("{base}/x2")),
                ("x3", format!("{base}/x3")),
            ]),
        )
        .await;
        mount_feed(
            &server,
            "/y.xml",
            rss(&[("y1", format!("{base}/y1")), ("y2", format!("{base}/y2"))]),
        )
        .await;

        let feeds = vec![format!("{base}/x.xml"), format!("{base}/y.xml")];
        let articles = fetcher(20).fetch_articles(&feeds, 2).await;

        let titles: Vec<_> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["x1", "x2", "y1", "y2"]);
        assert!(articles.len() <= feeds.len() * 2);
    }

    #[tokio::test]
    async fn test_malformed_feed_yields_nothing() {
        let server = MockServer::start().await;
        mount_article(&server, "/ok1", 1).await;
        let base = server.uri();
        mount_feed(&server, "/broken.xml", "this is not a feed".to_string()).await;
        mount_feed(&server, "/ok.xml", rss(&[("ok", format!("{base}/ok1"))])).await;

        let feeds = vec![
            format!("{base}/broken.xml"),
            "http://invalid.invalid/rss".to_string(),
            "/nonexistent/feed.xml".to_string(),
            format!("{base}/ok.xml"),
        ];
        let articles = fetcher(20).fetch_articles(&feeds, 3).await;

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "ok");
        assert_eq!(articles[0].content.as_ref().unwrap(), "/ok1 1");
    }

    #[tokio::test]
    async fn test_local_feed_file_and_failed_article() {
        let file = std::env::temp_dir().join(format!("news_digest_feed_{}.xml", std::process::id()));
        std::fs::write(&file, rss(&[("Offline", "http://invalid.invalid/story".to_string())])).unwrap();

        let locator = file.to_string_lossy().to_string();
        let articles = fetcher(20).fetch_articles(&[locator], 3).await;
        std::fs::remove_file(&file).ok();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].link, "http://invalid.invalid/story");
        let err = articles[0].content.as_ref().unwrap_err();
        assert!(err.to_string().contains("Error fetching content"));
    }

    #[test]
    fn test_entry_without_title() {
        let xml = r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title><item><link>http://example.com/1</link></item><item><title>no link</title></item></channel></rss>"#;
        let feed = feed_rs::parser::parse(xml.as_bytes()).unwrap();
        let mut entries = feed.entries.into_iter();

        let (title, link) = entry_title_and_link(entries.next().unwrap()).unwrap();
        assert_eq!(title, "");
        assert_eq!(link, "http://example.com/1");
        assert!(entry_title_and_link(entries.next().unwrap()).is_none());
    }
}
