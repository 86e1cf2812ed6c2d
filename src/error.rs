//! Error types for each pipeline stage.
//!
//! Every stage returns a `Result` instead of an error-describing string, so a
//! caller can always tell a real value from a failure. The `Display` output of
//! [`StageError`] keeps the familiar prefixes ("Error fetching content: ...",
//! "Error summarizing: ...", "Error in sentiment: ...") for the rendered digest.

use thiserror::Error;

/// Failure while retrieving a feed or an article page.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// Failure while talking to, or interpreting the answer of, a hosted model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("empty input text")]
    EmptyInput,

    #[error("invalid length bounds: min_length {min} > max_length {max}")]
    InvalidBounds { min: usize, max: usize },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("inference endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("inference api error: {0}")]
    Api(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unrecognised sentiment label: {0}")]
    UnexpectedLabel(String),

    #[error("score {0} outside [0, 1]")]
    InvalidScore(f64),
}

/// The failure recorded for one stage of one article.
#[derive(Error, Debug)]
pub enum StageError {
    #[error("Error fetching content: {0}")]
    Content(#[from] FetchError),

    #[error("Error summarizing: {0}")]
    Summary(#[source] ModelError),

    #[error("Error in sentiment: {0}")]
    Sentiment(#[source] ModelError),

    #[error("no article content to analyze")]
    NoContent,
}
