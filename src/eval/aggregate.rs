//! Batch aggregation: per-axis means, score distributions, totals
//!
//! Aggregation is a plain order-independent reduction; the summary is used
//! to localize whether weaknesses sit in retrieval (citation quality),
//! generation fidelity (correctness), or coverage (completeness).

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::eval::scorer::{effective_correctness, score};
use crate::eval::{Category, EvaluationRecord};

/// Count of 0/1/2 occurrences for one rubric axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub zeros: usize,
    pub ones: usize,
    pub twos: usize,
}

impl Histogram {
    fn record(&mut self, value: u8) {
        match value {
            0 => self.zeros += 1,
            1 => self.ones += 1,
            _ => self.twos += 1,
        }
    }

    /// Total observations
    pub fn total(&self) -> usize {
        self.zeros + self.ones + self.twos
    }

    /// Mean value over the observations, in [0, 2]
    pub fn mean(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (self.ones + 2 * self.twos) as f64 / total as f64
    }
}

/// Aggregated quality metrics for a batch of evaluation records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_records: usize,
    /// Sum of per-record totals (unanswerable rule applied)
    pub total_score: u32,
    /// 6 points per record
    pub max_score: u32,
    /// total_score as a fraction of max_score, in [0, 1]
    pub fraction: f64,
    pub correctness: Histogram,
    pub citation_quality: Histogram,
    pub completeness: Histogram,
    /// Record counts per question category
    pub category_counts: HashMap<Category, usize>,
}

impl BatchSummary {
    pub fn mean_correctness(&self) -> f64 {
        self.correctness.mean()
    }

    pub fn mean_citation_quality(&self) -> f64 {
        self.citation_quality.mean()
    }

    pub fn mean_completeness(&self) -> f64 {
        self.completeness.mean()
    }

    /// Formatted terminal summary
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", "EVALUATION SUMMARY".bold());
        let _ = writeln!(out, "Records:          {}", self.total_records);
        let _ = writeln!(
            out,
            "Total score:      {} / {} ({:.1}%)",
            self.total_score,
            self.max_score,
            self.fraction * 100.0
        );
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Average scores (out of 2):".bold());
        let _ = writeln!(out, "  Correctness:      {:.2}", self.mean_correctness());
        let _ = writeln!(out, "  Citation quality: {:.2}", self.mean_citation_quality());
        let _ = writeln!(out, "  Completeness:     {:.2}", self.mean_completeness());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Score distribution (0 / 1 / 2):".bold());
        for (name, hist) in [
            ("Correctness", &self.correctness),
            ("Citation quality", &self.citation_quality),
            ("Completeness", &self.completeness),
        ] {
            let _ = writeln!(
                out,
                "  {:<18} {} / {} / {}",
                name,
                hist.zeros.to_string().red(),
                hist.ones.to_string().yellow(),
                hist.twos.to_string().green()
            );
        }
        out
    }
}

/// Aggregate a batch of records into comparable quality metrics
///
/// Each record is scored independently with the unanswerable rule applied;
/// the reduction is associative and order-independent. An empty batch
/// yields an all-zero summary.
pub fn aggregate(records: &[EvaluationRecord]) -> BatchSummary {
    let mut summary = BatchSummary {
        total_records: records.len(),
        total_score: 0,
        max_score: (records.len() * 6) as u32,
        fraction: 0.0,
        correctness: Histogram::default(),
        citation_quality: Histogram::default(),
        completeness: Histogram::default(),
        category_counts: HashMap::new(),
    };

    for record in records {
        summary.total_score += score(record) as u32;
        summary.correctness.record(effective_correctness(record));
        summary.citation_quality.record(record.citation_quality.value());
        summary.completeness.record(record.completeness.value());
        *summary.category_counts.entry(record.category).or_insert(0) += 1;
    }

    if summary.max_score > 0 {
        summary.fraction = summary.total_score as f64 / summary.max_score as f64;
    }

    summary
}
