//! Retrieval engine: lexical scoring and the semantic collaborator joined
//! through score fusion
//!
//! Both score sources sit behind narrow interfaces so fusion stays agnostic
//! to how each signal was produced: BM25 is computed locally over the
//! candidate set, the semantic signal comes from any [`SemanticScorer`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::Result;
use crate::retrieval::fusion::{fuse, FusionWeights, ScoredPassage};
use crate::retrieval::lexical::Bm25Index;
use crate::store::{Passage, PassageStore};

/// Per-passage semantic similarity for one query
///
/// Assumed total over the candidate set: one score per passage, in the
/// passages' order.
#[async_trait]
pub trait SemanticScorer: Send + Sync {
    async fn scores(&self, query: &str, passages: &[Passage]) -> Result<Vec<f64>>;
}

/// Semantic scorer backed by already-computed scores keyed by passage id
///
/// Used when similarity comes precomputed from an external vector store,
/// and as a deterministic stand-in for tests. Passages without an entry
/// score zero.
pub struct PrecomputedScorer {
    scores: HashMap<String, f64>,
}

impl PrecomputedScorer {
    pub fn new(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// All passages score the given constant (degenerate signal)
    pub fn constant(value: f64) -> ConstantScorer {
        ConstantScorer { value }
    }
}

#[async_trait]
impl SemanticScorer for PrecomputedScorer {
    async fn scores(&self, _query: &str, passages: &[Passage]) -> Result<Vec<f64>> {
        Ok(passages
            .iter()
            .map(|p| *self.scores.get(&p.passage_id).unwrap_or(&0.0))
            .collect())
    }
}

/// Scorer returning the same value for every passage
pub struct ConstantScorer {
    value: f64,
}

#[async_trait]
impl SemanticScorer for ConstantScorer {
    async fn scores(&self, _query: &str, passages: &[Passage]) -> Result<Vec<f64>> {
        Ok(vec![self.value; passages.len()])
    }
}

/// Hybrid retrieval over a passage store
pub struct RetrievalEngine {
    store: Arc<dyn PassageStore>,
    scorer: Arc<dyn SemanticScorer>,
}

impl RetrievalEngine {
    /// Create a new retrieval engine
    pub fn new(store: Arc<dyn PassageStore>, scorer: Arc<dyn SemanticScorer>) -> Self {
        Self { store, scorer }
    }

    /// Retrieve the top_k passages for a query under the given weights
    ///
    /// Deterministic for fixed inputs. An empty candidate set yields an
    /// empty ranked list, not an error. Stateless per query: the BM25 index
    /// is built over the candidate snapshot each call, so the engine never
    /// holds mutable state across queries.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
        weights: FusionWeights,
    ) -> Result<Vec<ScoredPassage>> {
        weights.validate()?;

        let candidates = self.store.candidates()?;
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let texts: Vec<&str> = candidates.iter().map(|p| p.text.as_str()).collect();
        let index = Bm25Index::build(&texts);
        let lexical_scores = index.score_query(query);

        let semantic_scores = self.scorer.scores(query, &candidates).await?;

        fuse(candidates, &lexical_scores, &semantic_scores, weights, top_k)
    }
}
