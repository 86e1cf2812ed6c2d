//! Hosted model inference.
//!
//! The summarizer and the sentiment classifier are pretrained models served
//! behind an HTTP inference endpoint (Hugging Face Inference API or anything
//! speaking the same JSON). This module defines the seam the pipeline talks
//! to and the hosted implementations of it.
//!
//! # Architecture
//!
//! - [`SummaryModel`] / [`SentimentModel`]: what the pipeline needs from a model
//! - [`InferenceClient`]: shared HTTP plumbing (endpoint, token, error mapping)
//! - [`HostedSummarizer`] / [`HostedClassifier`]: one model id each
//!
//! Requests are sent once. There is no retry and no timeout beyond whatever
//! the supplied `reqwest::Client` carries.

use crate::error::ModelError;
use crate::models::StarScore;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Inputs for one summarization call.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRequest<'a> {
    pub text: &'a str,
    /// Model language tag of the input, e.g. `"en_XX"`.
    pub src_lang: &'a str,
    pub max_length: usize,
    pub min_length: usize,
    pub length_penalty: f32,
}

/// A sequence-to-sequence model that writes abstractive summaries.
pub trait SummaryModel {
    /// Produce one summary of `request.text` within the length bounds.
    async fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String, ModelError>;
}

/// A five-class star-rating classifier.
pub trait SentimentModel {
    /// Score `text` against every star class. Order is not significant.
    async fn classify(&self, text: &str) -> Result<Vec<StarScore>, ModelError>;
}

/// HTTP access to an inference endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct InferenceClient {
    http: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceClient")
            .field("endpoint", &self.endpoint)
            .field("api_token", &self.api_token.as_deref().map(|_| "<redacted>"))
            .finish()
    }
}

impl InferenceClient {
    pub fn new(http: Client, endpoint: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.endpoint, model)
    }

    /// POST `body` to the model and decode the JSON answer.
    #[instrument(level = "debug", skip(self, body))]
    async fn post<T: DeserializeOwned>(&self, model: &str, body: &Value) -> Result<T, ModelError> {
        let t0 = Instant::now();
        let mut request = self.http.post(self.model_url(model)).json(body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let elapsed_ms = t0.elapsed().as_millis() as u64;

        let parsed = serde_json::from_str::<Value>(&text);
        if let Ok(Some(error)) = parsed.as_ref().map(api_error) {
            warn!(%status, elapsed_ms, %error, "Inference endpoint reported an error");
            return Err(ModelError::Api(error));
        }

        if !status.is_success() {
            warn!(%status, elapsed_ms, "Inference call failed");
            return Err(ModelError::Status {
                status,
                body: truncate_for_log(&text, 300),
            });
        }

        debug!(elapsed_ms, bytes = text.len(), "Inference call returned");
        parsed
            .and_then(serde_json::from_value::<T>)
            .map_err(|e| {
                ModelError::UnexpectedResponse(format!("{e}: {}", truncate_for_log(&text, 300)))
            })
    }
}

/// The `error` field of an `{"error": ...}` body, if present.
fn api_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// A summarization model served by an [`InferenceClient`].
#[derive(Debug, Clone)]
pub struct HostedSummarizer {
    client: InferenceClient,
    model: String,
}

impl HostedSummarizer {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[derive(Deserialize)]
struct SummaryText {
    summary_text: String,
}

impl SummaryModel for HostedSummarizer {
    #[instrument(level = "info", skip_all, fields(model = %self.model, src_lang = request.src_lang))]
    async fn summarize(&self, request: &SummaryRequest<'_>) -> Result<String, ModelError> {
        let body = json!({
            "inputs": request.text,
            "parameters": {
                "src_lang": request.src_lang,
                "max_length": request.max_length,
                "min_length": request.min_length,
                "length_penalty": request.length_penalty,
                "truncation": "only_first",
            },
            "options": { "wait_for_model": true },
        });

        let summaries: Vec<SummaryText> = self.client.post(&self.model, &body).await?;
        let summary = summaries
            .into_iter()
            .next()
            .map(|s| s.summary_text)
            .ok_or_else(|| ModelError::UnexpectedResponse("no summary returned".to_string()))?;
        info!(chars = summary.chars().count(), "Summary generated");
        Ok(summary)
    }
}

/// A star-rating classifier served by an [`InferenceClient`].
#[derive(Debug, Clone)]
pub struct HostedClassifier {
    client: InferenceClient,
    model: String,
}

impl HostedClassifier {
    pub fn new(client: InferenceClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

/// Text classification answers come nested per input or flat.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scores {
    Nested(Vec<Vec<StarScore>>),
    Flat(Vec<StarScore>),
}

impl SentimentModel for HostedClassifier {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn classify(&self, text: &str) -> Result<Vec<StarScore>, ModelError> {
        let body = json!({
            "inputs": text,
            "options": { "wait_for_model": true },
        });

        let scores = match self.client.post::<Scores>(&self.model, &body).await? {
            Scores::Nested(nested) => nested.into_iter().next().unwrap_or_default(),
            Scores::Flat(flat) => flat,
        };
        debug!(classes = scores.len(), "Sentiment scores received");
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, header, method, path},
    };

    fn client(server: &MockServer, token: Option<&str>) -> InferenceClient {
        InferenceClient::new(
            Client::new(),
            format!("{}/models/", server.uri()),
            token.map(str::to_string),
        )
    }

    fn request(text: &str) -> SummaryRequest<'_> {
        SummaryRequest {
            text,
            src_lang: "fr_XX",
            max_length: 130,
            min_length: 30,
            length_penalty: 2.0,
        }
    }

    #[tokio::test]
    async fn test_summarize_sends_bounds_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/facebook/mbart"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(json!({
                "inputs": "Un long article.",
                "parameters": {
                    "src_lang": "fr_XX",
                    "max_length": 130,
                    "min_length": 30,
                    "truncation": "only_first"
                }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "summary_text": "Court." }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let model = HostedSummarizer::new(client(&server, Some("secret")), "facebook/mbart");
        let summary = model.summarize(&request("Un long article.")).await.unwrap();
        assert_eq!(summary, "Court.");
    }

    #[tokio::test]
    async fn test_summarize_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(503).set_body_json(json!({ "error": "Model is loading" })),
            )
            .mount(&server)
            .await;

        let model = HostedSummarizer::new(client(&server, None), "m");
        let err = model.summarize(&request("text")).await.unwrap_err();
        assert!(matches!(err, ModelError::Api(ref msg) if msg == "Model is loading"));
    }

    #[tokio::test]
    async fn test_summarize_status_error_without_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let model = HostedSummarizer::new(client(&server, None), "m");
        let err = model.summarize(&request("text")).await.unwrap_err();
        match err {
            ModelError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_summarize_empty_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let model = HostedSummarizer::new(client(&server, None), "m");
        let err = model.summarize(&request("text")).await.unwrap_err();
        assert!(matches!(err, ModelError::UnexpectedResponse(_)));
    }

    #[tokio::test]
    async fn test_classify_nested_and_flat() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/nested"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[
                { "label": "5 stars", "score": 0.7 },
                { "label": "4 stars", "score": 0.2 }
            ]])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/models/flat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "label": "1 star", "score": 0.9 }])),
            )
            .mount(&server)
            .await;

        let nested = HostedClassifier::new(client(&server, None), "nested");
        let scores = nested.classify("great").await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].label, "5 stars");

        let flat = HostedClassifier::new(client(&server, None), "flat");
        let scores = flat.classify("awful").await.unwrap();
        assert_eq!(scores, vec![StarScore { label: "1 star".into(), score: 0.9 }]);
    }

    #[tokio::test]
    async fn test_classify_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let model = HostedClassifier::new(client(&server, None), "m");
        let err = model.classify("text").await.unwrap_err();
        assert!(matches!(err, ModelError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let c = InferenceClient::new(Client::new(), "http://x/", Some("secret".into()));
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("secret"));
        assert!(dbg.contains("<redacted>"));
        assert_eq!(c.model_url("a/b"), "http://x/a/b");
    }
}
