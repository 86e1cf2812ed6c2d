//! Feed reading and article scraping.
//!
//! Scraping runs in two phases:
//!
//! 1. **Feeds**: [`feed::FeedFetcher`] reads each feed locator (URL or local
//!    file) and keeps the first few entries.
//! 2. **Content**: [`content::ContentExtractor`] downloads each entry link and
//!    keeps a bounded number of `<p>` paragraphs.
//!
//! Both phases share one `reqwest::Client`, so the request timeout applies to
//! feeds and article pages alike. Failures are logged and recorded per
//! article; they never abort the batch.

pub mod content;
pub mod feed;
