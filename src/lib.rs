//! docanchor - Grounded question answering core
//!
//! Answers natural-language questions against a private document
//! collection, grounding every claim in retrievable source text and
//! abstaining when no supporting passage exists.
//!
//! # Architecture
//!
//! - **retrieval**: BM25 lexical ranking fused with semantic similarity
//! - **grounding**: the citation contract, context assembly, and
//!   post-generation enforcement
//! - **generation**: the external generator seam with tagged outcomes and
//!   bounded retry
//! - **eval**: the 0-6 rubric scorer, batch aggregation, and the
//!   append-only record log

pub mod errors;
pub mod store;
pub mod retrieval;
pub mod grounding;
pub mod generation;
pub mod pipeline;
pub mod eval;
pub mod cli;

// Re-export commonly used types
pub use errors::{DocAnchorError, Result};
pub use grounding::{Answer, Citation, Defect};
pub use pipeline::{AnswerPipeline, GroundedAnswer, PipelineConfig};
pub use retrieval::{FusionWeights, RetrievalEngine, ScoredPassage};
pub use store::Passage;
