//! Runtime settings.
//!
//! Settings come from an optional YAML file; any key the file omits keeps its
//! default. Command-line flags are applied on top in `main`.

use crate::models::Variant;
use serde::Deserialize;
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};

/// Feeds read when neither the config file nor the command line name any.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://techcrunch.com/feed/",
    "http://feeds.bbci.co.uk/news/rss.xml",
    "https://www.aljazeera.com/xml/rss/all.xml",
];

pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feeds: Vec<String>,
    pub entries_per_feed: usize,
    pub request_timeout_secs: u64,
    /// Paragraphs kept per article in the full variant.
    pub max_paragraphs: usize,
    /// Paragraphs kept per article in the lite variant.
    pub lite_max_paragraphs: usize,
    pub inference: InferenceSettings,
    pub summary: SummarySettings,
    pub sentiment: SentimentSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Base URL; the model id is appended as a path.
    pub endpoint: String,
    #[serde(skip)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub model: String,
    pub max_length: usize,
    pub min_length: usize,
    pub length_penalty: f32,
    /// Whitespace tokens passed to the model at most.
    pub max_input_tokens: usize,
    /// Characters passed to the model at most, applied after the token cut.
    /// Bounds scripts that do not separate words with spaces.
    pub max_input_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SentimentSettings {
    pub model: String,
    pub max_input_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|s| s.to_string()).collect(),
            entries_per_feed: 3,
            request_timeout_secs: 10,
            max_paragraphs: 20,
            lite_max_paragraphs: 10,
            inference: InferenceSettings::default(),
            summary: SummarySettings::default(),
            sentiment: SentimentSettings::default(),
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_token: None,
        }
    }
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "facebook/mbart-large-50-many-to-many-mmt".to_string(),
            max_length: 130,
            min_length: 30,
            length_penalty: 2.0,
            max_input_tokens: 1024,
            max_input_chars: 3000,
        }
    }
}

impl Default for SentimentSettings {
    fn default() -> Self {
        Self {
            model: "nlptown/bert-base-multilingual-uncased-sentiment".to_string(),
            max_input_chars: 512,
        }
    }
}

impl Settings {
    /// Parse settings from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let settings: Settings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let yaml = tokio::fs::read_to_string(path.as_ref()).await?;
        let settings = Self::from_yaml(&yaml)?;
        info!(feeds = settings.feeds.len(), "Loaded configuration");
        Ok(settings)
    }

    /// Paragraphs kept per article for `variant`.
    ///
    /// # Returns
    ///
    /// `max_paragraphs` for the full variant, `lite_max_paragraphs` for lite.
    pub fn max_paragraphs_for(&self, variant: Variant) -> usize {
        match variant {
            Variant::Full => self.max_paragraphs,
            Variant::Lite => self.lite_max_paragraphs,
        }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.summary.min_length > self.summary.max_length {
            return Err(format!(
                "summary.min_length ({}) exceeds summary.max_length ({})",
                self.summary.min_length, self.summary.max_length
            )
            .into());
        }
        if self.entries_per_feed == 0 {
            return Err("entries_per_feed must be at least 1".into());
        }
        if self.max_paragraphs == 0 || self.lite_max_paragraphs == 0 {
            return Err("paragraph limits must be at least 1".into());
        }
        if self.summary.max_input_tokens == 0
            || self.summary.max_input_chars == 0
            || self.sentiment.max_input_chars == 0
        {
            return Err("model input limits must be at least 1".into());
        }
        Ok(())
    }
}
