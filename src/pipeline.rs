//! End-to-end answer pipeline: retrieve -> assemble context -> generate
//! under the grounding contract -> enforce
//!
//! Retrieval failure modes stay honest: an empty candidate set or an
//! unanswerable question produces an explicit abstention, while generator
//! infrastructure failure surfaces as a hard error rather than a fabricated
//! answer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::Result;
use crate::generation::{generate_with_retry, GenerationOutcome, Generator, RetryPolicy};
use crate::grounding::{
    build_context, build_prompt, corrective_instruction, Answer, ContractEnforcer, Defect,
};
use crate::retrieval::{FusionWeights, RetrievalEngine, ScoredPassage};
use crate::store::Passage;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Passages handed to the generator; tunable, multi-hop questions need
    /// more than one
    pub top_k: usize,
    pub weights: FusionWeights,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            weights: FusionWeights::default(),
        }
    }
}

/// A validated answer with its evidence and any detected defects
#[derive(Debug, Clone)]
pub struct GroundedAnswer {
    pub answer: Answer,
    /// Contract defects detected post-generation; never silently corrected
    pub defects: Vec<Defect>,
    /// The ranked passages the answer was generated from
    pub passages: Vec<ScoredPassage>,
}

/// Grounded question answering pipeline
pub struct AnswerPipeline {
    engine: RetrievalEngine,
    generator: Arc<dyn Generator>,
    enforcer: ContractEnforcer,
    retry: RetryPolicy,
    config: PipelineConfig,
}

impl AnswerPipeline {
    /// Create a pipeline with default configuration
    pub fn new(engine: RetrievalEngine, generator: Arc<dyn Generator>) -> Self {
        Self::with_config(engine, generator, PipelineConfig::default(), RetryPolicy::default())
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(
        engine: RetrievalEngine,
        generator: Arc<dyn Generator>,
        config: PipelineConfig,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            engine,
            generator,
            enforcer: ContractEnforcer::new(),
            retry,
            config,
        }
    }

    /// Answer a question from the document collection
    pub async fn answer(&self, question: &str) -> Result<GroundedAnswer> {
        self.answer_with(question, self.config.top_k, self.config.weights)
            .await
    }

    /// Answer with explicit retrieval parameters
    pub async fn answer_with(
        &self,
        question: &str,
        top_k: usize,
        weights: FusionWeights,
    ) -> Result<GroundedAnswer> {
        let passages = self.engine.retrieve(question, top_k, weights).await?;

        // Nothing retrieved: abstain immediately, no generator call
        if passages.is_empty() {
            return Ok(GroundedAnswer {
                answer: Answer::abstention(),
                defects: Vec::new(),
                passages,
            });
        }

        let context = build_context(&passages);
        let prompt = build_prompt(question, &context);

        let outcome = generate_with_retry(
            self.generator.as_ref(),
            &prompt,
            corrective_instruction(),
            &self.retry,
        )
        .await?;

        let plain: Vec<Passage> = passages.iter().map(|s| s.passage.clone()).collect();

        match outcome {
            GenerationOutcome::Success(answer) => {
                let defects = self.enforcer.validate(&answer, &plain);
                Ok(GroundedAnswer {
                    answer,
                    defects,
                    passages,
                })
            }
            GenerationOutcome::Malformed { raw } => Ok(GroundedAnswer {
                answer: Answer::abstention(),
                defects: vec![Defect::MalformedOutput { raw }],
                passages,
            }),
            // generate_with_retry converts exhausted transients into an error
            GenerationOutcome::TransientFailure { reason } => {
                Err(crate::errors::DocAnchorError::GenerationFailed(reason))
            }
        }
    }

    /// Current configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
