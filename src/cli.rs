//! Command-line interface definitions.
//!
//! Every option is optional: with no flags the tool reads the built-in feed
//! list, runs the full pipeline and prints the digest as Markdown.

use crate::config::Settings;
use crate::models::Variant;
use clap::Parser;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Full pipeline over the default feeds
/// news_digest --hf-token $HF_API_TOKEN
///
/// # Scrape-only run over a custom feed, 5 entries, JSON report
/// news_digest --lite -f https://example.com/rss.xml -l 5 -j ./json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Scrape and detect language only; skip summarization and sentiment
    #[arg(long)]
    pub lite: bool,

    /// Feed URL or local feed file (repeatable); replaces the configured feeds
    #[arg(short, long = "feed")]
    pub feeds: Vec<String>,

    /// Entries read from each feed
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output directory for the JSON report
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Bearer token for the inference endpoint
    #[arg(long, env = "HF_API_TOKEN", hide_env_values = true)]
    pub hf_token: Option<String>,

    /// Base URL of the inference endpoint
    #[arg(long, env = "INFERENCE_ENDPOINT")]
    pub inference_endpoint: Option<String>,
}

impl Cli {
    pub fn variant(&self) -> Variant {
        if self.lite { Variant::Lite } else { Variant::Full }
    }

    /// Overlay command-line values onto loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if !self.feeds.is_empty() {
            settings.feeds = self.feeds.clone();
        }
        if let Some(limit) = self.limit {
            settings.entries_per_feed = limit;
        }
        if let Some(endpoint) = &self.inference_endpoint {
            settings.inference.endpoint = endpoint.clone();
        }
        if self.hf_token.is_some() {
            settings.inference.api_token = self.hf_token.clone();
        }
    }
}
