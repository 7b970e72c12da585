//! Score fusion: one total order from two heterogeneous ranking signals
//!
//! Raw BM25 scores are unbounded and corpus-size-dependent; semantic
//! similarity is bounded. Combining them without normalization would let
//! whichever signal has the larger magnitude dominate regardless of the
//! configured weights, so each list is min-max rescaled over the candidate
//! set before the weighted sum.

use serde::{Deserialize, Serialize};

use crate::errors::{DocAnchorError, Result};
use crate::store::Passage;

/// Tolerance for the weight-sum check
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Value a degenerate score list (all equal) normalizes to
const DEGENERATE_NORM: f64 = 0.5;

/// Weights for combining lexical and semantic signals
///
/// The default favors the semantic signal: lexical scoring contributes most
/// on exact-token queries such as identifiers, while semantic scoring
/// dominates paraphrase queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FusionWeights {
    pub lexical: f64,
    pub semantic: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            lexical: 0.3,
            semantic: 0.7,
        }
    }
}

impl FusionWeights {
    /// Create weights, rejecting pairs that do not sum to 1
    pub fn new(lexical: f64, semantic: f64) -> Result<Self> {
        let weights = Self { lexical, semantic };
        weights.validate()?;
        Ok(weights)
    }

    /// Weights must sum to 1 and be non-negative; never silently defaulted
    pub fn validate(&self) -> Result<()> {
        let sum = self.lexical + self.semantic;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE || self.lexical < 0.0 || self.semantic < 0.0 {
            return Err(DocAnchorError::InvalidWeights {
                lexical: self.lexical,
                semantic: self.semantic,
            });
        }
        Ok(())
    }
}

/// A passage annotated with ranking signals for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Raw BM25 score, unbounded and corpus-relative
    pub lexical_score: f64,
    /// Raw similarity score from the semantic collaborator
    pub semantic_score: f64,
    /// Weighted combination of the normalized signals, in [0, 1]
    pub fused_score: f64,
    /// 1-based position after fusion
    pub rank: usize,
}

/// Min-max normalize a score list to [0, 1] over the candidate set
///
/// A degenerate list (all scores equal, e.g. all zero) normalizes to a
/// constant rather than dividing by zero.
pub fn normalize(scores: &[f64]) -> Vec<f64> {
    let Some(first) = scores.first() else {
        return Vec::new();
    };

    let mut min = *first;
    let mut max = *first;
    for score in scores {
        min = min.min(*score);
        max = max.max(*score);
    }

    if max == min {
        return vec![DEGENERATE_NORM; scores.len()];
    }

    scores.iter().map(|s| (s - min) / (max - min)).collect()
}

/// Fuse lexical and semantic scores over a fixed candidate set into one
/// ranked, truncated list
///
/// Sort order: fused score descending; ties broken by semantic score
/// descending, then passage_id ascending, so the ranking is fully
/// deterministic for reproducible evaluation. A top_k larger than the
/// candidate count returns all candidates.
pub fn fuse(
    passages: Vec<Passage>,
    lexical_scores: &[f64],
    semantic_scores: &[f64],
    weights: FusionWeights,
    top_k: usize,
) -> Result<Vec<ScoredPassage>> {
    weights.validate()?;

    if lexical_scores.len() != passages.len() {
        return Err(DocAnchorError::ScoreCountMismatch {
            expected: passages.len(),
            got: lexical_scores.len(),
        });
    }
    if semantic_scores.len() != passages.len() {
        return Err(DocAnchorError::ScoreCountMismatch {
            expected: passages.len(),
            got: semantic_scores.len(),
        });
    }

    let lexical_norm = normalize(lexical_scores);
    let semantic_norm = normalize(semantic_scores);

    let mut scored: Vec<ScoredPassage> = passages
        .into_iter()
        .enumerate()
        .map(|(i, passage)| ScoredPassage {
            passage,
            lexical_score: lexical_scores[i],
            semantic_score: semantic_scores[i],
            fused_score: weights.lexical * lexical_norm[i] + weights.semantic * semantic_norm[i],
            rank: 0,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.fused_score
            .total_cmp(&a.fused_score)
            .then_with(|| b.semantic_score.total_cmp(&a.semantic_score))
            .then_with(|| a.passage.passage_id.cmp(&b.passage.passage_id))
    });
    scored.truncate(top_k);

    for (i, entry) in scored.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    Ok(scored)
}
