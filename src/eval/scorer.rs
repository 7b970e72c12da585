//! Per-record scoring with the adversarial unanswerable rule
//!
//! Ordinary correctness scoring (closeness to an expected string) is
//! meaningless when no expected answer exists, so unanswerable questions
//! get a hard rule: fabricated content forces correctness to zero, and a
//! non-abstaining answer can never earn full correctness.

use crate::eval::{Category, EvaluationRecord};

/// Correctness after the unanswerable rule is applied
///
/// For `Category::Unanswerable`:
/// - any fabricated content forces 0 regardless of surface fluency
/// - an answer that did not abstain (`has_sufficient_context == true`)
///   is capped at 1, since full correctness requires a truthful abstention
pub fn effective_correctness(record: &EvaluationRecord) -> u8 {
    let rated = record.correctness.value();
    if record.category != Category::Unanswerable {
        return rated;
    }
    if record.fabricated {
        return 0;
    }
    if record.answer.has_sufficient_context {
        return rated.min(1);
    }
    rated
}

/// Total score for one record, in 0..=6
pub fn score(record: &EvaluationRecord) -> u8 {
    effective_correctness(record)
        + record.citation_quality.value()
        + record.completeness.value()
}
