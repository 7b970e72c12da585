//! Integration tests for hybrid retrieval through the public API

use std::collections::HashMap;
use std::sync::Arc;

use docanchor::retrieval::{FusionWeights, PrecomputedScorer, RetrievalEngine};
use docanchor::store::{InMemoryStore, Passage};

fn passage(id: &str, seq: usize, text: &str) -> Passage {
    Passage {
        passage_id: id.to_string(),
        document_id: "doc-1".to_string(),
        document_title: "Invoice 2025-01".to_string(),
        page_number: Some(seq as u32 + 1),
        sequence_index: seq,
        text: text.to_string(),
    }
}

fn invoice_corpus() -> Vec<Passage> {
    vec![
        passage("p40", 0, "This agreement covers consulting services for Q1."),
        passage("p41", 1, "Payment terms are net thirty days from delivery."),
        passage("p42", 2, "Invoice No: FV/2025/01/0847"),
        passage("p43", 3, "The office address is ul. Prosta 20, Warsaw."),
    ]
}

fn engine(passages: Vec<Passage>, scorer: Arc<PrecomputedScorer>) -> RetrievalEngine {
    RetrievalEngine::new(Arc::new(InMemoryStore::new(passages).unwrap()), scorer)
}

#[tokio::test]
async fn test_invoice_number_query_ranks_exact_match_first() {
    // Semantic signal is mildly misleading: it prefers the payment passage
    let mut semantic = HashMap::new();
    semantic.insert("p40".to_string(), 0.40);
    semantic.insert("p41".to_string(), 0.55);
    semantic.insert("p42".to_string(), 0.50);
    semantic.insert("p43".to_string(), 0.20);

    let engine = engine(invoice_corpus(), Arc::new(PrecomputedScorer::new(semantic)));
    let ranked = engine
        .retrieve(
            "What is the invoice number?",
            4,
            FusionWeights::default(),
        )
        .await
        .unwrap();

    // Only p42 contains the query's rare term, so the lexical signal puts
    // it on top despite the 0.3 weight
    assert_eq!(ranked[0].passage.passage_id, "p42");
    assert_eq!(ranked[0].rank, 1);
    assert!(ranked[0].fused_score >= ranked[1].fused_score);
}

#[tokio::test]
async fn test_flat_semantic_signal_reduces_to_lexical_ranking() {
    // Identical semantic scores normalize to a constant, contributing only
    // an offset; the fused order must equal the pure lexical order
    let flat: HashMap<String, f64> = invoice_corpus()
        .iter()
        .map(|p| (p.passage_id.clone(), 0.0))
        .collect();

    let engine = engine(invoice_corpus(), Arc::new(PrecomputedScorer::new(flat)));
    let ranked = engine
        .retrieve("invoice FV/2025/01/0847", 4, FusionWeights::default())
        .await
        .unwrap();

    assert_eq!(ranked[0].passage.passage_id, "p42");
    assert!(ranked[0].lexical_score > ranked[1].lexical_score);
}

#[tokio::test]
async fn test_retrieval_is_deterministic_across_calls() {
    let mut semantic = HashMap::new();
    for p in invoice_corpus() {
        semantic.insert(p.passage_id.clone(), 0.3);
    }
    let engine = engine(invoice_corpus(), Arc::new(PrecomputedScorer::new(semantic)));

    let mut orderings = Vec::new();
    for _ in 0..5 {
        let ranked = engine
            .retrieve("payment terms", 4, FusionWeights::default())
            .await
            .unwrap();
        orderings.push(
            ranked
                .iter()
                .map(|s| s.passage.passage_id.clone())
                .collect::<Vec<_>>(),
        );
    }
    assert!(orderings.windows(2).all(|w| w[0] == w[1]));
}

#[tokio::test]
async fn test_top_k_truncates_and_oversized_k_returns_all() {
    let semantic: HashMap<String, f64> = HashMap::new();
    let engine = engine(invoice_corpus(), Arc::new(PrecomputedScorer::new(semantic)));

    let two = engine
        .retrieve("invoice", 2, FusionWeights::default())
        .await
        .unwrap();
    assert_eq!(two.len(), 2);

    let all = engine
        .retrieve("invoice", 50, FusionWeights::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
}

#[tokio::test]
async fn test_weights_not_summing_to_one_rejected() {
    let engine = engine(
        invoice_corpus(),
        Arc::new(PrecomputedScorer::new(HashMap::new())),
    );
    let result = engine
        .retrieve(
            "invoice",
            3,
            FusionWeights {
                lexical: 0.6,
                semantic: 0.6,
            },
        )
        .await;
    assert!(result.is_err());
}
