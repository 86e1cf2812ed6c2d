//! Multilingual abstractive summarization.
//!
//! The summarization model needs the source language as one of its own tags.
//! Detected codes go through a fixed table; any code not in it (including
//! `"unknown"`) is summarized as English, and the substitution is recorded in
//! the returned [`Summary`] as [`SourceLang::Fallback`].

use crate::api::{SummaryModel, SummaryRequest};
use crate::config::SummarySettings;
use crate::error::{ModelError, StageError};
use crate::models::{Language, SourceLang, Summary};
use crate::utils::truncate_chars;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Detected language code → model language tag.
pub const LANG_TAGS: &[(&str, &str)] = &[
    ("en", "en_XX"),
    ("fr", "fr_XX"),
    ("ar", "ar_AR"),
    ("ur", "ur_PK"),
];

/// Tag used for every code missing from [`LANG_TAGS`].
pub const DEFAULT_LANG_TAG: &str = "en_XX";

/// Map a detected language code to the model's tag.
pub fn resolve_source_lang(code: &str) -> SourceLang {
    match LANG_TAGS.iter().find(|(c, _)| *c == code) {
        Some(&(code, tag)) => SourceLang::Supported {
            code: code.to_string(),
            tag,
        },
        None => SourceLang::Fallback {
            requested: code.to_string(),
            tag: DEFAULT_LANG_TAG,
        },
    }
}

/// The first `max_tokens` whitespace-separated tokens of `text`.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> &str {
    let mut count = 0;
    let mut in_token = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if in_token {
                count += 1;
                in_token = false;
                if count == max_tokens {
                    return &text[..i];
                }
            }
        } else {
            in_token = true;
        }
    }
    text
}

/// Summarization stage bound to a model.
#[derive(Debug)]
pub struct Summarizer<M> {
    model: M,
    settings: SummarySettings,
}

impl<M: SummaryModel> Summarizer<M> {
    pub fn new(model: M, settings: SummarySettings) -> Self {
        Self { model, settings }
    }

    /// Summarize `text`, written in `language`, with one model call.
    ///
    /// The input is cut to `max_input_tokens` whitespace tokens and then to
    /// `max_input_chars` characters before it is sent.
    ///
    /// # Arguments
    ///
    /// * `text` - Article text to summarize
    /// * `language` - Detected language, mapped to the model's language tag
    ///
    /// # Returns
    ///
    /// The trimmed summary with the language tag actually used, or a
    /// [`StageError::Summary`] for invalid bounds, empty input or a failed
    /// model call.
    #[instrument(level = "info", skip_all, fields(lang = language.code(), len = text.len()))]
    pub async fn summarize(&self, text: &str, language: &Language) -> Result<Summary, StageError> {
        let source_lang = resolve_source_lang(language.code());
        if let SourceLang::Fallback { requested, tag } = &source_lang {
            warn!(%requested, %tag, "Language not supported by summarizer; using default tag");
        }

        let SummarySettings {
            max_length,
            min_length,
            length_penalty,
            max_input_tokens,
            max_input_chars,
            ..
        } = self.settings;
        if min_length > max_length {
            return Err(StageError::Summary(ModelError::InvalidBounds {
                min: min_length,
                max: max_length,
            }));
        }

        let input = truncate_chars(truncate_tokens(text.trim(), max_input_tokens), max_input_chars);
        if input.len() < text.trim().len() {
            debug!(chars = input.chars().count(), "Truncated summarizer input");
        }
        if input.is_empty() {
            return Err(StageError::Summary(ModelError::EmptyInput));
        }

        let t0 = Instant::now();
        let request = SummaryRequest {
            text: input,
            src_lang: source_lang.tag(),
            max_length,
            min_length,
            length_penalty,
        };
        let text = self
            .model
            .summarize(&request)
            .await
            .map_err(StageError::Summary)?;
        info!(elapsed_ms = t0.elapsed().as_millis() as u64, "Summarized article");

        Ok(Summary {
            text: text.trim().to_string(),
            source_lang,
        })
    }
}
