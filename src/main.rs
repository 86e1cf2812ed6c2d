//! # News Digest
//!
//! Fetches news from RSS/Atom feeds, scrapes each article's paragraph text,
//! detects its language and, in the full variant, summarizes it and scores
//! its sentiment with hosted multilingual models.
//!
//! ## Usage
//!
//! ```sh
//! news_digest --hf-token $HF_API_TOKEN -j ./json
//! news_digest --lite -f https://techcrunch.com/feed/
//! ```
//!
//! ## Architecture
//!
//! One run is a strictly sequential pipeline:
//! 1. **Feeds**: read each feed and keep the first few entries
//! 2. **Content**: download each entry link and keep its first paragraphs
//! 3. **Language**: detect the language of the paragraph text
//! 4. **Models** (full variant): summarize, then classify sentiment
//! 5. **Output**: Markdown digest on stdout, optional JSON report

use chrono::Local;
use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod config;
mod error;
mod language;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod sentiment;
mod summarizer;
mod utils;

use api::InferenceClient;
use cli::Cli;
use config::Settings;
use models::Digest;
use outputs::{json, markdown};
use pipeline::HostedModels;
use scrapers::content::ContentExtractor;
use scrapers::feed::FeedFetcher;
use utils::{ensure_writable_dir, time_of_day};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_digest starting up");

    let args = Cli::parse();
    debug!(?args.config, lite = args.lite, feeds = args.feeds.len(), "Parsed CLI arguments");

    // ---- Settings ----
    let mut settings = match &args.config {
        Some(path) => Settings::load(path).await?,
        None => Settings::default(),
    };
    args.apply(&mut settings);
    settings.validate()?;
    let variant = args.variant();
    info!(%variant, feeds = settings.feeds.len(), limit = settings.entries_per_feed, "Settings ready");

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(path = %dir, error = %e, "JSON output directory is not writable");
            return Err(e);
        }
    }

    // ---- Services, built once ----
    let http = Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .user_agent(USER_AGENT)
        .build()?;
    let max_paragraphs = settings.max_paragraphs_for(variant);
    let fetcher = FeedFetcher::new(http.clone(), ContentExtractor::new(http, max_paragraphs));

    let models = if variant.runs_models() {
        // Inference has no client-side timeout.
        let inference_http = Client::builder().user_agent(USER_AGENT).build()?;
        let client = InferenceClient::new(
            inference_http,
            settings.inference.endpoint.clone(),
            settings.inference.api_token.clone(),
        );
        info!(?client, summary_model = %settings.summary.model, sentiment_model = %settings.sentiment.model, "Models ready");
        Some(HostedModels::hosted(client, &settings))
    } else {
        None
    };

    // ---- Fetch and analyse ----
    let articles = pipeline::run(
        &fetcher,
        &settings.feeds,
        settings.entries_per_feed,
        models.as_ref(),
    )
    .await;

    let now = Local::now();
    let digest = Digest {
        local_date: now.date_naive().to_string(),
        time_of_day: time_of_day(),
        local_time: now.time().format("%H:%M:%S").to_string(),
        variant,
        articles,
    };

    // ---- Output ----
    print!("{}", markdown::digest_to_markdown(&digest));

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = json::write_digest(&digest, dir).await {
            error!(error = %e, "Failed to write JSON report");
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        articles = digest.articles.len(),
        "Execution complete"
    );

    Ok(())
}
