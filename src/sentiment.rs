//! News sentiment from a five-star rating model.
//!
//! The model rates text from 1 to 5 stars. Only the top class is kept and it
//! is reduced to three buckets: 1-2 stars negative, 3 neutral, 4-5 positive.
//! The top class's score is reported unchanged.

use crate::api::SentimentModel;
use crate::config::SentimentSettings;
use crate::error::{ModelError, StageError};
use crate::models::{Sentiment, SentimentBucket, StarScore};
use crate::utils::truncate_chars;
use std::time::Instant;
use tracing::{info, instrument};

/// Star count from a label such as `"1 star"` or `"4 stars"`.
pub fn parse_stars(label: &str) -> Option<u8> {
    let (count, unit) = label.trim().split_once(' ')?;
    if !matches!(unit, "star" | "stars") {
        return None;
    }
    count.parse().ok()
}

/// Turn the model's class scores into a [`Sentiment`].
pub fn reduce(scores: &[StarScore]) -> Result<Sentiment, ModelError> {
    let top = scores
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ModelError::UnexpectedResponse("no sentiment classes returned".to_string()))?;

    let (stars, bucket) = parse_stars(&top.label)
        .and_then(|stars| SentimentBucket::from_stars(stars).map(|bucket| (stars, bucket)))
        .ok_or_else(|| ModelError::UnexpectedLabel(top.label.clone()))?;

    if !(0.0..=1.0).contains(&top.score) {
        return Err(ModelError::InvalidScore(top.score));
    }

    Ok(Sentiment {
        bucket,
        stars,
        score: top.score,
    })
}

/// Sentiment stage bound to a model.
#[derive(Debug)]
pub struct SentimentClassifier<M> {
    model: M,
    settings: SentimentSettings,
}

impl<M: SentimentModel> SentimentClassifier<M> {
    pub fn new(model: M, settings: SentimentSettings) -> Self {
        Self { model, settings }
    }

    /// Classify the first `max_input_chars` characters of `text`.
    #[instrument(level = "info", skip_all, fields(len = text.len()))]
    pub async fn classify(&self, text: &str) -> Result<Sentiment, StageError> {
        let input = truncate_chars(text.trim(), self.settings.max_input_chars);
        if input.is_empty() {
            return Err(StageError::Sentiment(ModelError::EmptyInput));
        }

        let t0 = Instant::now();
        let scores = self
            .model
            .classify(input)
            .await
            .map_err(StageError::Sentiment)?;
        let sentiment = reduce(&scores).map_err(StageError::Sentiment)?;
        info!(
            stars = sentiment.stars,
            score = sentiment.score,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Classified sentiment"
        );
        Ok(sentiment)
    }
}
