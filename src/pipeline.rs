//! Per-article orchestration: fetch → detect → summarize → classify.
//!
//! Everything runs strictly in sequence, one article after another. The
//! models are built once by the caller and only borrowed here.

use crate::api::{HostedClassifier, HostedSummarizer, InferenceClient, SentimentModel, SummaryModel};
use crate::config::Settings;
use crate::error::StageError;
use crate::language::detect_language;
use crate::models::{Article, ArticleReport, Language, StageOutcome};
use crate::scrapers::feed::FeedFetcher;
use crate::sentiment::SentimentClassifier;
use crate::summarizer::Summarizer;
use tracing::{info, instrument, warn};

/// The two model-backed stages of the full variant.
///
/// Built once at startup and shared read-only for the whole run.
#[derive(Debug)]
pub struct Models<S, C> {
    pub summarizer: Summarizer<S>,
    pub sentiment: SentimentClassifier<C>,
}

impl<S, C> Models<S, C> {
    pub fn new(summarizer: Summarizer<S>, sentiment: SentimentClassifier<C>) -> Self {
        Self {
            summarizer,
            sentiment,
        }
    }
}

/// Models served by the configured inference endpoint.
pub type HostedModels = Models<HostedSummarizer, HostedClassifier>;

impl HostedModels {
    pub fn hosted(client: InferenceClient, settings: &Settings) -> Self {
        let summarizer = HostedSummarizer::new(client.clone(), &settings.summary.model);
        let classifier = HostedClassifier::new(client, &settings.sentiment.model);
        Models::new(
            Summarizer::new(summarizer, settings.summary.clone()),
            SentimentClassifier::new(classifier, settings.sentiment.clone()),
        )
    }
}

/// Fetch every feed and analyse each article.
///
/// # Arguments
///
/// * `fetcher` - Feed reader; its extractor decides the paragraph limit
/// * `feeds` - Feed locators, read in order
/// * `limit` - Entries taken from each feed
/// * `models` - Summarizer and classifier for the full variant, `None` for lite
///
/// # Returns
///
/// One report per article, in feed-then-entry order. With `models` set every
/// article with content is summarized and classified; without, only language
/// detection runs.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len(), limit = limit, full = models.is_some()))]
pub async fn run<S, C>(
    fetcher: &FeedFetcher,
    feeds: &[String],
    limit: usize,
    models: Option<&Models<S, C>>,
) -> Vec<ArticleReport>
where
    S: SummaryModel,
    C: SentimentModel,
{
    let articles = fetcher.fetch_articles(feeds, limit).await;
    analyze_all(articles, models).await
}

/// Analyse articles in order.
pub async fn analyze_all<S, C>(
    articles: Vec<Article>,
    models: Option<&Models<S, C>>,
) -> Vec<ArticleReport>
where
    S: SummaryModel,
    C: SentimentModel,
{
    let total = articles.len();
    let mut reports = Vec::with_capacity(total);
    for (index, article) in articles.into_iter().enumerate() {
        info!(index, total, link = %article.link, "Analyzing article");
        reports.push(analyze(article, models).await);
    }

    let failed = reports
        .iter()
        .filter(|r| {
            !r.content.is_ok()
                || r.summary.as_ref().is_some_and(|s| !s.is_ok())
                || r.sentiment.as_ref().is_some_and(|s| !s.is_ok())
        })
        .count();
    info!(total, failed, "Finished analyzing articles");
    reports
}

/// Run every stage on one article.
#[instrument(level = "debug", skip_all, fields(link = %article.link))]
pub async fn analyze<S, C>(article: Article, models: Option<&Models<S, C>>) -> ArticleReport
where
    S: SummaryModel,
    C: SentimentModel,
{
    let language = match &article.content {
        Ok(text) => detect_language(text),
        Err(_) => Language::Unknown,
    };

    let (summary, sentiment) = match (models, &article.content) {
        (None, _) => (None, None),
        (Some(models), Ok(text)) => {
            let summary = models.summarizer.summarize(text, &language).await;
            if let Err(e) = &summary {
                warn!(error = %e, "Summary stage failed");
            }
            let sentiment = models.sentiment.classify(text).await;
            if let Err(e) = &sentiment {
                warn!(error = %e, "Sentiment stage failed");
            }
            (
                Some(StageOutcome::from(summary)),
                Some(StageOutcome::from(sentiment)),
            )
        }
        (Some(_), Err(e)) => {
            warn!(error = %e, "No content; skipping model stages");
            let reason = StageError::NoContent.to_string();
            (
                Some(StageOutcome::Failed {
                    reason: reason.clone(),
                }),
                Some(StageOutcome::Failed { reason }),
            )
        }
    };

    ArticleReport {
        title: article.title,
        link: article.link,
        language,
        content: StageOutcome::from(article.content),
        summary,
        sentiment,
    }
}
