//! Semantic similarity backends.
//!
//! `EmbeddingApiSimilarity` calls an OpenAI-compatible `/embeddings` endpoint
//! and compares the two vectors; `LexicalSimilarity` is the offline fallback.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::screening::signals::tokenize;
use crate::services::SimilarityOracle;

/// Cosine similarity of two dense vectors, clamped to [0, 1].
///
/// Mismatched dimensions and zero vectors yield 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Term-frequency cosine over the shared tokenizer. Deterministic and offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    pub fn score(text_a: &str, text_b: &str) -> f64 {
        let tf_a = term_frequencies(text_a);
        let tf_b = term_frequencies(text_b);

        let dot: f64 = tf_a
            .iter()
            .filter_map(|(term, &count)| tf_b.get(term).map(|&other| count * other))
            .sum();
        let norm_a = tf_a.values().map(|c| c * c).sum::<f64>().sqrt();
        let norm_b = tf_b.values().map(|c| c * c).sum::<f64>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

fn term_frequencies(text: &str) -> BTreeMap<String, f64> {
    let mut counts = BTreeMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0.0) += 1.0;
    }
    counts
}

#[async_trait]
impl SimilarityOracle for LexicalSimilarity {
    async fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        Self::score(text_a, text_b)
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("embedding API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("expected 2 embeddings, got {0}")]
    Count(usize),
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 2],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f32>,
    #[serde(default)]
    index: Option<usize>,
}

/// Similarity via a remote sentence-embedding model.
///
/// Any failure falls back to `LexicalSimilarity`, so callers always get a score.
#[derive(Clone)]
pub struct EmbeddingApiSimilarity {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl EmbeddingApiSimilarity {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            api_key,
            model,
        }
    }

    async fn embed_pair(&self, text_a: &str, text_b: &str) -> Result<(Vec<f32>, Vec<f32>), EmbeddingError> {
        let mut request = self.client.post(&self.endpoint).json(&EmbeddingRequest {
            model: &self.model,
            input: [text_a, text_b],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut body: EmbeddingResponse = response.json().await?;
        if body.data.len() != 2 {
            return Err(EmbeddingError::Count(body.data.len()));
        }
        body.data.sort_by_key(|d| d.index.unwrap_or(usize::MAX));
        let second = body.data.pop().map(|d| d.embedding).unwrap_or_default();
        let first = body.data.pop().map(|d| d.embedding).unwrap_or_default();
        Ok((first, second))
    }
}

#[async_trait]
impl SimilarityOracle for EmbeddingApiSimilarity {
    async fn similarity(&self, text_a: &str, text_b: &str) -> f64 {
        match self.embed_pair(text_a, text_b).await {
            Ok((a, b)) => {
                let score = cosine_similarity(&a, &b);
                debug!(score, model = %self.model, "embedding similarity computed");
                score
            }
            Err(e) => {
                warn!(error = %e, "embedding similarity failed; falling back to lexical");
                LexicalSimilarity::score(text_a, text_b)
            }
        }
    }

    fn name(&self) -> &'static str {
        "embedding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_http;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::time::Duration;

    /// OpenAI-style embeddings stub; the requested model picks the reply shape.
    async fn stub_embeddings(Json(request): Json<Value>) -> Response {
        if request["input"].as_array().map(Vec::len) != Some(2) {
            return (StatusCode::BAD_REQUEST, "expected two inputs").into_response();
        }
        let data = match request["model"].as_str().unwrap_or_default() {
            "reversed" => json!([
                { "index": 1, "embedding": [0.0, 1.0] },
                { "index": 0, "embedding": [1.0, 0.0] },
            ]),
            "aligned" => json!([
                { "index": 0, "embedding": [1.0, 0.0] },
                { "index": 1, "embedding": [1.0, 1.0] },
            ]),
            "single" => json!([{ "index": 0, "embedding": [1.0] }]),
            _ => return (StatusCode::SERVICE_UNAVAILABLE, "overloaded").into_response(),
        };
        Json(json!({ "object": "list", "data": data })).into_response()
    }

    async fn stub_oracle(model: &str) -> EmbeddingApiSimilarity {
        let base = test_http::serve(Router::new().route("/v1/embeddings", post(stub_embeddings))).await;
        EmbeddingApiSimilarity::new(Client::new(), &format!("{base}/v1"), None, model.to_string())
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite_vectors_clamp_to_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_and_mismatched() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_lexical_is_symmetric_and_bounded() {
        let a = "Python developer with AWS and Docker";
        let b = "Looking for a Python engineer who knows Docker";
        let ab = LexicalSimilarity::score(a, b);
        let ba = LexicalSimilarity::score(b, a);
        assert_eq!(ab, ba);
        assert!(ab > 0.0 && ab < 1.0);
    }

    #[test]
    fn test_lexical_identical_text_is_one() {
        let sim = LexicalSimilarity::score("rust tokio axum", "Rust, Tokio, Axum.");
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lexical_empty_text_is_zero() {
        assert_eq!(LexicalSimilarity::score("", "anything"), 0.0);
        assert_eq!(LexicalSimilarity::score("", ""), 0.0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_falls_back_to_lexical() {
        let client = Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        // Port 9 (discard) on localhost is closed in test environments.
        let oracle = EmbeddingApiSimilarity::new(client, "http://127.0.0.1:9/v1", None, "m".to_string());
        let sim = oracle.similarity("python sql", "python sql").await;
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_embeddings_ordered_by_index() {
        let oracle = stub_oracle("reversed").await;
        let (first, second) = oracle.embed_pair("a", "b").await.unwrap();
        assert_eq!(first, vec![1.0, 0.0]);
        assert_eq!(second, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_embedding_similarity_uses_vectors() {
        let oracle = stub_oracle("aligned").await;
        // identical texts would score 1.0 lexically
        let sim = oracle.similarity("python sql", "python sql").await;
        assert!((sim - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_wrong_embedding_count_is_an_error() {
        let oracle = stub_oracle("single").await;
        assert!(matches!(oracle.embed_pair("a", "b").await, Err(EmbeddingError::Count(1))));
        let sim = oracle.similarity("python sql", "python sql").await;
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_api_error_status_and_message() {
        let oracle = stub_oracle("missing-model").await;
        match oracle.embed_pair("a", "b").await {
            Err(EmbeddingError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "overloaded");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_trailing_slash_normalized() {
        let oracle = EmbeddingApiSimilarity::new(Client::new(), "http://host/v1/", None, "m".to_string());
        assert_eq!(oracle.endpoint, "http://host/v1/embeddings");
    }
}
