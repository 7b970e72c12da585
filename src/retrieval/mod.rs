//! Hybrid retrieval: lexical BM25 + semantic similarity fused into one
//! ranked evidence list

pub mod embedding;
pub mod engine;
pub mod fusion;
pub mod lexical;

pub use embedding::{EmbeddingScorer, Embedder, OllamaEmbedder};
pub use engine::{PrecomputedScorer, RetrievalEngine, SemanticScorer};
pub use fusion::{fuse, normalize, FusionWeights, ScoredPassage};
pub use lexical::{tokenize, Bm25Index};
