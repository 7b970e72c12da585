//! Answer generation seam: tagged outcomes and bounded retry
//!
//! The generator is an external black box. Its result is a tagged outcome
//! rather than an exception, so retry and backoff logic is explicit and
//! testable with a deterministic stub instead of a live model.

pub mod ollama;

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

use crate::errors::{DocAnchorError, Result};
use crate::grounding::Answer;

pub use ollama::OllamaGenerator;

/// Result of one generation attempt
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// Output parsed into the answer shape
    Success(Answer),
    /// Output received but not parseable into the answer shape
    Malformed { raw: String },
    /// Retryable failure (timeout, connection, 5xx)
    TransientFailure { reason: String },
}

/// External answer-producing collaborator
#[async_trait]
pub trait Generator: Send + Sync {
    /// One generation attempt for a fully-built contract prompt
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome>;
}

/// Bounded retry with exponential backoff for transient failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Attempts for transient failures (not counting the corrective retry)
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8_000,
        }
    }
}

impl RetryPolicy {
    /// Delay before the given retry attempt (0-based), with jitter
    fn delay(&self, attempt: u32) -> Duration {
        let exp = self.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
        let capped = exp.min(self.max_delay_ms);
        let jitter = rand::thread_rng().gen_range(0..=capped / 4);
        Duration::from_millis(capped + jitter)
    }
}

/// Drive a generator to a final outcome under the retry policy
///
/// Transient failures are retried up to `max_attempts` with backoff and then
/// surfaced as a hard [`DocAnchorError::GenerationFailed`]; the system never
/// synthesizes an answer from outside the passages. Malformed output gets
/// exactly one corrective retry with `corrective` appended to the prompt; if
/// the retry is also malformed the outcome is returned as
/// [`GenerationOutcome::Malformed`] for the caller to tag as a defect.
pub async fn generate_with_retry(
    generator: &dyn Generator,
    prompt: &str,
    corrective: &str,
    policy: &RetryPolicy,
) -> Result<GenerationOutcome> {
    let mut corrected = false;
    let mut current_prompt = prompt.to_string();
    let mut transient_attempts = 0u32;

    loop {
        match generator.generate(&current_prompt).await? {
            GenerationOutcome::Success(answer) => {
                return Ok(GenerationOutcome::Success(answer));
            }
            GenerationOutcome::Malformed { raw } => {
                if corrected {
                    return Ok(GenerationOutcome::Malformed { raw });
                }
                corrected = true;
                current_prompt = format!("{}{}", prompt, corrective);
            }
            GenerationOutcome::TransientFailure { reason } => {
                transient_attempts += 1;
                if transient_attempts >= policy.max_attempts {
                    return Err(DocAnchorError::GenerationFailed(format!(
                        "retries exhausted after {} attempts: {}",
                        transient_attempts, reason
                    )));
                }
                tokio::time::sleep(policy.delay(transient_attempts - 1)).await;
            }
        }
    }
}
