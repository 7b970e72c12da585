//! Error types for the docanchor core
//!
//! One taxonomy covers retrieval input errors, generator failures, and
//! evaluation input errors. Contract violations are deliberately NOT errors:
//! they are surfaced as [`crate::grounding::Defect`] data so the evaluation
//! layer can penalize them instead of hiding them.

use thiserror::Error;

/// Main error type for the docanchor core
#[derive(Error, Debug)]
pub enum DocAnchorError {
    /// Fusion weights that do not sum to 1 are rejected, never defaulted
    #[error("Invalid fusion weights: lexical {lexical} + semantic {semantic} must sum to 1.0")]
    InvalidWeights { lexical: f64, semantic: f64 },

    /// Score list length does not match the candidate set
    #[error("Score count mismatch: expected {expected} scores, got {got}")]
    ScoreCountMismatch { expected: usize, got: usize },

    /// Generator unreachable or still failing after bounded retries
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Generator request exceeded its deadline
    #[error("Generation timed out after {duration_ms}ms")]
    GenerationTimeout { duration_ms: u64 },

    /// Embedding collaborator failure
    #[error("Embedding failed: {0}")]
    EmbeddingFailed(String),

    /// Rating out of range or missing category at record creation
    #[error("Invalid scoring input: {0}")]
    ScoringInput(String),

    /// Passage violating a store invariant (empty text, sequence order)
    #[error("Invalid passage {passage_id}: {reason}")]
    InvalidPassage { passage_id: String, reason: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, DocAnchorError>;

/// Convert anyhow errors to DocAnchorError
impl From<anyhow::Error> for DocAnchorError {
    fn from(err: anyhow::Error) -> Self {
        DocAnchorError::Generic(err.to_string())
    }
}
