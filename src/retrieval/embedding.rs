//! Embedding-backed semantic scorer
//!
//! The embedding model itself is an opaque collaborator (text -> vector).
//! This module provides the [`Embedder`] seam, an Ollama-backed
//! implementation with bounded retry, and a [`SemanticScorer`] that turns
//! embeddings into cosine similarity scores.

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::{DocAnchorError, Result};
use crate::retrieval::engine::SemanticScorer;
use crate::store::Passage;

/// Default embedding request timeout
const EMBED_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry attempts for transient embedding failures
const EMBED_MAX_ATTEMPTS: u32 = 3;

/// Base backoff delay between embedding retries
const EMBED_BASE_DELAY_MS: u64 = 500;

/// Opaque text-to-vector collaborator
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f64>>;
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f64>,
}

/// Embedder backed by the Ollama /api/embeddings endpoint
pub struct OllamaEmbedder {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    /// Create a new embedder against an Ollama instance
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(EMBED_TIMEOUT)
            .build()
            .map_err(DocAnchorError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    async fn embed_once(&self, text: &str) -> Result<Vec<f64>> {
        let url = format!("{}/api/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(DocAnchorError::EmbeddingFailed(format!(
                "embedding API returned {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response.json().await?;
        if body.embedding.is_empty() {
            return Err(DocAnchorError::EmbeddingFailed(
                "embedding API returned an empty vector".to_string(),
            ));
        }
        Ok(body.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    /// Embed with exponential backoff and jitter on transient failures
    async fn embed(&self, text: &str) -> Result<Vec<f64>> {
        let mut last_err = None;
        for attempt in 0..EMBED_MAX_ATTEMPTS {
            match self.embed_once(text).await {
                Ok(vector) => return Ok(vector),
                Err(err) => {
                    last_err = Some(err);
                    if attempt + 1 < EMBED_MAX_ATTEMPTS {
                        let jitter = rand::thread_rng().gen_range(0..EMBED_BASE_DELAY_MS / 2);
                        let delay = EMBED_BASE_DELAY_MS * 2u64.pow(attempt) + jitter;
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| {
            DocAnchorError::EmbeddingFailed("embedding retries exhausted".to_string())
        }))
    }
}

/// Cosine similarity between two vectors; zero if either norm is zero
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    dot / (norm_a * norm_b)
}

fn l2_norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Semantic scorer that embeds the query and each passage, scoring by
/// cosine similarity
pub struct EmbeddingScorer {
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingScorer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }
}

#[async_trait]
impl SemanticScorer for EmbeddingScorer {
    async fn scores(&self, query: &str, passages: &[Passage]) -> Result<Vec<f64>> {
        let query_vector = self.embedder.embed(query).await?;

        let mut scores = Vec::with_capacity(passages.len());
        for passage in passages {
            let vector = self.embedder.embed(&passage.text).await?;
            if vector.len() != query_vector.len() {
                return Err(DocAnchorError::EmbeddingFailed(format!(
                    "dimension mismatch for passage {}: query {} vs passage {}",
                    passage.passage_id,
                    query_vector.len(),
                    vector.len()
                )));
            }
            scores.push(cosine_similarity(&query_vector, &vector));
        }
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-9);
    }

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f64>> {
            // Query aligns with "alpha" text, not with "beta"
            Ok(match text {
                t if t.contains("alpha") => vec![1.0, 0.0],
                t if t.contains("beta") => vec![0.0, 1.0],
                _ => vec![1.0, 0.1],
            })
        }
    }

    #[tokio::test]
    async fn test_embedding_scorer_orders_by_similarity() {
        let scorer = EmbeddingScorer::new(Arc::new(FixedEmbedder));
        let passages = vec![
            Passage {
                passage_id: "p1".to_string(),
                document_id: "d".to_string(),
                document_title: "D".to_string(),
                page_number: None,
                sequence_index: 0,
                text: "alpha content".to_string(),
            },
            Passage {
                passage_id: "p2".to_string(),
                document_id: "d".to_string(),
                document_title: "D".to_string(),
                page_number: None,
                sequence_index: 1,
                text: "beta content".to_string(),
            },
        ];

        let scores = scorer.scores("some question", &passages).await.unwrap();
        assert!(scores[0] > scores[1]);
    }
}
