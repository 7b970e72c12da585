//! Integration tests for batch evaluation: exact aggregation over a known
//! batch and the append-only record log

use tempfile::tempdir;

use docanchor::eval::{aggregate, score, Category, EvaluationRecord, RecordLog};
use docanchor::grounding::Answer;

fn confident_answer(text: &str) -> Answer {
    Answer {
        text: text.to_string(),
        citations: Vec::new(),
        has_sufficient_context: true,
    }
}

fn record(
    id: &str,
    category: Category,
    ratings: (u8, u8, u8),
    answer: Answer,
) -> EvaluationRecord {
    EvaluationRecord::new(
        id,
        &format!("question {}", id),
        "expected answer",
        answer,
        category,
        ratings.0,
        ratings.1,
        ratings.2,
    )
    .unwrap()
}

/// A 30-question batch with known score assignments:
/// - 10 answerable, all rated (2, 2, 2) -> 60 points
/// - 10 multi-hop, all rated (1, 2, 1) -> 40 points
/// - 10 unanswerable: 5 truthful abstentions rated (2, 2, 2), 5 fabricated
///   rated (2, 0, 0) whose correctness is forced to 0 -> 30 + 0 points
fn batch_of_thirty() -> Vec<EvaluationRecord> {
    let mut records = Vec::new();

    for i in 0..10 {
        records.push(record(
            &format!("ans-{}", i),
            Category::Answerable,
            (2, 2, 2),
            confident_answer("grounded answer"),
        ));
    }
    for i in 0..10 {
        records.push(record(
            &format!("hop-{}", i),
            Category::MultiHop,
            (1, 2, 1),
            confident_answer("partially combined answer"),
        ));
    }
    for i in 0..5 {
        records.push(record(
            &format!("unans-clean-{}", i),
            Category::Unanswerable,
            (2, 2, 2),
            Answer::abstention(),
        ));
    }
    for i in 0..5 {
        records.push(
            record(
                &format!("unans-fab-{}", i),
                Category::Unanswerable,
                (2, 0, 0),
                confident_answer("made-up but fluent answer"),
            )
            .mark_fabricated(),
        );
    }

    records
}

#[test]
fn test_thirty_record_batch_aggregates_exactly() {
    let records = batch_of_thirty();
    let summary = aggregate(&records);

    assert_eq!(summary.total_records, 30);
    assert_eq!(summary.max_score, 180);
    assert_eq!(summary.total_score, 60 + 40 + 30);
    assert!((summary.fraction - 130.0 / 180.0).abs() < 1e-12);

    // Correctness: 10 + 5 twos, 10 ones, 5 forced zeros
    assert_eq!(summary.correctness.twos, 15);
    assert_eq!(summary.correctness.ones, 10);
    assert_eq!(summary.correctness.zeros, 5);

    // Citation quality: raters' values untouched
    assert_eq!(summary.citation_quality.twos, 25);
    assert_eq!(summary.citation_quality.zeros, 5);

    assert_eq!(summary.category_counts[&Category::Answerable], 10);
    assert_eq!(summary.category_counts[&Category::MultiHop], 10);
    assert_eq!(summary.category_counts[&Category::Unanswerable], 10);

    let expected_mean = (15.0 * 2.0 + 10.0) / 30.0;
    assert!((summary.mean_correctness() - expected_mean).abs() < 1e-12);
}

#[test]
fn test_truthful_abstention_scores_full_marks() {
    let clean = record(
        "q-unans",
        Category::Unanswerable,
        (2, 2, 2),
        Answer::abstention(),
    );
    assert_eq!(score(&clean), 6);
}

#[test]
fn test_fabrication_never_scores_above_zero_correctness() {
    for rated in 0..=2u8 {
        let fabricated = record(
            "q-fab",
            Category::Unanswerable,
            (rated, 1, 1),
            confident_answer("invented"),
        )
        .mark_fabricated();
        assert_eq!(score(&fabricated), 2, "rated correctness {}", rated);
    }
}

#[test]
fn test_log_round_trip_preserves_batch_scores() {
    let dir = tempdir().unwrap();
    let log = RecordLog::new(&dir.path().join("records.jsonl"));

    let records = batch_of_thirty();
    for record in &records {
        log.append(record).unwrap();
    }

    let read_back = log.read_all().unwrap();
    assert_eq!(read_back.len(), 30);

    let original = aggregate(&records);
    let reloaded = aggregate(&read_back);
    assert_eq!(original.total_score, reloaded.total_score);
    assert_eq!(original.correctness, reloaded.correctness);
    assert_eq!(original.citation_quality, reloaded.citation_quality);
    assert_eq!(original.completeness, reloaded.completeness);
}

#[test]
fn test_out_of_range_rating_rejected_at_creation() {
    let result = EvaluationRecord::new(
        "q1",
        "question",
        "expected",
        Answer::abstention(),
        Category::Answerable,
        2,
        7,
        1,
    );
    assert!(result.is_err());
}
