//! Data models for articles and their analysed representations.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: an entry read from a feed, with its scraped content
//! - [`Language`], [`Summary`], [`Sentiment`]: per-stage results
//! - [`ArticleReport`] and [`Digest`]: the rendered/serialised output of one run
//! - [`StageOutcome`]: a serialisable success/failure tag for one stage

use crate::error::StageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which flavour of the pipeline is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Scrape, detect language, summarize and classify sentiment.
    Full,
    /// Scrape and detect language only.
    Lite,
}

impl Variant {
    pub fn runs_models(self) -> bool {
        matches!(self, Variant::Full)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Full => f.write_str("full"),
            Variant::Lite => f.write_str("lite"),
        }
    }
}

/// A feed entry together with the text scraped from its link.
///
/// Built once by the feed fetcher and never mutated afterwards. `content`
/// already holds at most the configured number of paragraphs.
#[derive(Debug)]
pub struct Article {
    /// Entry title, empty when the feed omits it.
    pub title: String,
    /// Entry link the content was scraped from.
    pub link: String,
    /// Paragraph text, or the reason it could not be fetched.
    pub content: Result<String, StageError>,
}

/// Result of language detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Language {
    Detected {
        /// Two-letter code where one exists, otherwise ISO 639-3.
        code: String,
        confidence: f64,
        reliable: bool,
    },
    Unknown,
}

impl Language {
    pub const UNKNOWN_CODE: &'static str = "unknown";

    /// The language code, or `"unknown"`.
    pub fn code(&self) -> &str {
        match self {
            Language::Detected { code, .. } => code,
            Language::Unknown => Self::UNKNOWN_CODE,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// How a language hint was turned into a summarization model tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceLang {
    /// The hint is in the model's language table.
    Supported { code: String, tag: &'static str },
    /// The hint is not in the table; the default tag was used instead.
    Fallback { requested: String, tag: &'static str },
}

impl SourceLang {
    pub fn tag(&self) -> &'static str {
        match self {
            SourceLang::Supported { tag, .. } | SourceLang::Fallback { tag, .. } => tag,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SourceLang::Fallback { .. })
    }
}

/// An abstractive summary produced by the summarization model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub text: String,
    pub source_lang: SourceLang,
}

/// One class of the star-rating model with its score.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StarScore {
    /// Raw model label, e.g. `"1 star"` or `"4 stars"`.
    pub label: String,
    pub score: f64,
}

/// Three-way reduction of the five star classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentBucket {
    Negative,
    Neutral,
    Positive,
}

impl SentimentBucket {
    /// 1-2 stars are negative, 3 neutral, 4-5 positive.
    pub fn from_stars(stars: u8) -> Option<Self> {
        match stars {
            1 | 2 => Some(SentimentBucket::Negative),
            3 => Some(SentimentBucket::Neutral),
            4 | 5 => Some(SentimentBucket::Positive),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SentimentBucket::Negative => "Negative News (People may dislike it)",
            SentimentBucket::Neutral => "Neutral News",
            SentimentBucket::Positive => "Positive News (People may like it)",
        }
    }
}

/// Sentiment of an article, taken from the top-scoring star class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub bucket: SentimentBucket,
    pub stars: u8,
    /// Confidence of the top class, in `[0, 1]`.
    pub score: f64,
}

impl Sentiment {
    pub const ERROR_LABEL: &'static str = "Error in sentiment";

    pub fn label(&self) -> &'static str {
        self.bucket.label()
    }
}

/// Serialisable success/failure tag for a single stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome<T> {
    Ok { value: T },
    Failed { reason: String },
}

impl<T> StageOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, StageOutcome::Ok { .. })
    }
}

impl<T> From<Result<T, StageError>> for StageOutcome<T> {
    fn from(result: Result<T, StageError>) -> Self {
        match result {
            Ok(value) => StageOutcome::Ok { value },
            Err(e) => StageOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }
}

/// Everything the pipeline learned about one article.
#[derive(Debug, Serialize)]
pub struct ArticleReport {
    pub title: String,
    pub link: String,
    pub language: Language,
    pub content: StageOutcome<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<StageOutcome<Summary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<StageOutcome<Sentiment>>,
}

/// All reports of one run.
#[derive(Debug, Serialize)]
pub struct Digest {
    /// The date of the run in `YYYY-MM-DD` format.
    pub local_date: String,
    /// "morning", "afternoon" or "evening".
    pub time_of_day: String,
    pub local_time: String,
    pub variant: Variant,
    pub articles: Vec<ArticleReport>,
}
