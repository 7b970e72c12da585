//! Quality evaluation model
//!
//! Records are rated by a human or judge model on a fixed 0-2 rubric per
//! axis (correctness, citation quality, completeness). The core does not
//! generate the judgments; it validates them at creation, applies the
//! adversarial unanswerable rule, and aggregates batches.

pub mod aggregate;
pub mod log;
pub mod scorer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DocAnchorError, Result};
use crate::grounding::Answer;

pub use aggregate::{aggregate, BatchSummary, Histogram};
pub use log::RecordLog;
pub use scorer::{effective_correctness, score};

/// Question category for evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Answerable from a single passage
    Answerable,
    /// Requires combining evidence from two or more passages
    MultiHop,
    /// Adversarial: the corpus contains no supporting passage
    Unanswerable,
}

/// A rubric rating, validated to 0..=2 at construction
///
/// Out-of-range values are rejected, never clamped; silent clamping would
/// corrupt the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: u8) -> Result<Self> {
        if value > 2 {
            return Err(DocAnchorError::ScoringInput(format!(
                "rating {} out of range 0-2",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        Rating::new(value).map_err(|e| e.to_string())
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> u8 {
        rating.0
    }
}

/// One scored question: the produced answer plus its three ratings
///
/// Created once after rating and never mutated again (append-only audit
/// trail via [`RecordLog`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Stable key for the audit trail, independent of question_id
    pub record_id: Uuid,
    pub question_id: String,
    pub question: String,
    /// Expected answer text; empty for unanswerable questions
    pub expected: String,
    pub answer: Answer,
    pub category: Category,
    pub correctness: Rating,
    pub citation_quality: Rating,
    pub completeness: Rating,
    /// Rater flag: the answer contains content invented outside the passages
    #[serde(default)]
    pub fabricated: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EvaluationRecord {
    /// Create a rated record, validating each rating
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        question_id: &str,
        question: &str,
        expected: &str,
        answer: Answer,
        category: Category,
        correctness: u8,
        citation_quality: u8,
        completeness: u8,
    ) -> Result<Self> {
        if question_id.trim().is_empty() {
            return Err(DocAnchorError::ScoringInput(
                "question_id must not be empty".to_string(),
            ));
        }

        Ok(Self {
            record_id: Uuid::new_v4(),
            question_id: question_id.to_string(),
            question: question.to_string(),
            expected: expected.to_string(),
            answer,
            category,
            correctness: Rating::new(correctness)?,
            citation_quality: Rating::new(citation_quality)?,
            completeness: Rating::new(completeness)?,
            fabricated: false,
            notes: None,
            created_at: Utc::now(),
        })
    }

    /// Mark the answer as containing invented content (set by the rater)
    pub fn mark_fabricated(mut self) -> Self {
        self.fabricated = true;
        self
    }

    /// Attach evaluator notes
    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}
