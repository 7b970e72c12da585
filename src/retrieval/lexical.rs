//! Lexical ranker: Okapi BM25 over a tokenized passage corpus
//!
//! BM25 carries exact-token queries (invoice numbers, identifiers, technical
//! terms) that embedding similarity tends to blur. Tokenization is shared
//! between corpus build and query scoring; any skew between the two silently
//! degrades ranking quality, so both paths go through [`tokenize`].

use std::collections::HashMap;

/// BM25 term-frequency saturation parameter
const K1: f64 = 1.5;

/// BM25 length-normalization parameter
const B: f64 = 0.75;

/// Floor factor for negative IDF values (terms in most of the corpus)
const IDF_EPSILON: f64 = 0.25;

/// Tokenize text for indexing and querying: lowercase, whitespace split,
/// basic punctuation stripped from token ends, empties dropped
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|t| t.trim_matches(|c| ".,!?;:()[]{}".contains(c)).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// BM25 index over a fixed corpus of passage texts
///
/// Built once per candidate set; scoring is then a pure function of the
/// query tokens.
pub struct Bm25Index {
    /// Term frequencies per document
    doc_term_freqs: Vec<HashMap<String, usize>>,
    /// Document lengths in tokens
    doc_lens: Vec<usize>,
    /// Precomputed IDF per term, with the negative-IDF floor applied
    idf: HashMap<String, f64>,
    avg_doc_len: f64,
}

impl Bm25Index {
    /// Build an index from raw passage texts
    pub fn build(texts: &[&str]) -> Self {
        let tokenized: Vec<Vec<String>> = texts.iter().map(|t| tokenize(t)).collect();

        let doc_lens: Vec<usize> = tokenized.iter().map(|tokens| tokens.len()).collect();
        let total_len: usize = doc_lens.iter().sum();
        let avg_doc_len = if tokenized.is_empty() {
            0.0
        } else {
            (total_len as f64 / tokenized.len() as f64).max(1.0)
        };

        let mut doc_term_freqs = Vec::with_capacity(tokenized.len());
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for tokens in &tokenized {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in tokens {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            doc_term_freqs.push(freqs);
        }

        let idf = Self::compute_idf(&doc_freq, tokenized.len());

        Self {
            doc_term_freqs,
            doc_lens,
            idf,
            avg_doc_len,
        }
    }

    /// Probabilistic IDF with the Okapi negative-value floor: terms appearing
    /// in more than half the corpus would go negative, so they are replaced
    /// by a small fraction of the mean IDF instead
    fn compute_idf(doc_freq: &HashMap<String, usize>, n_docs: usize) -> HashMap<String, f64> {
        let n = n_docs as f64;
        let mut idf: HashMap<String, f64> = HashMap::new();
        let mut idf_sum = 0.0;
        let mut negative_terms: Vec<String> = Vec::new();

        for (term, df) in doc_freq {
            let value = ((n - *df as f64 + 0.5) / (*df as f64 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative_terms.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }

        if !idf.is_empty() {
            let floor = IDF_EPSILON * (idf_sum / idf.len() as f64);
            for term in negative_terms {
                idf.insert(term, floor);
            }
        }

        idf
    }

    /// Score every document against the query tokens
    ///
    /// Passages sharing no terms with the query score zero. An empty query
    /// yields all zeros, which degrades the fused ranking to pure semantic
    /// ordering downstream (documented fallback, not an error).
    pub fn scores(&self, query_tokens: &[String]) -> Vec<f64> {
        let mut scores = vec![0.0; self.doc_term_freqs.len()];

        for token in query_tokens {
            let Some(idf) = self.idf.get(token) else {
                continue;
            };
            for (doc_idx, freqs) in self.doc_term_freqs.iter().enumerate() {
                let tf = *freqs.get(token).unwrap_or(&0) as f64;
                if tf == 0.0 {
                    continue;
                }
                let doc_len = self.doc_lens[doc_idx] as f64;
                let norm = 1.0 - B + B * doc_len / self.avg_doc_len;
                scores[doc_idx] += idf * (tf * (K1 + 1.0)) / (tf + K1 * norm);
            }
        }

        scores
    }

    /// Score a raw query string
    pub fn score_query(&self, query: &str) -> Vec<f64> {
        self.scores(&tokenize(query))
    }

    /// Number of documents in the index
    pub fn len(&self) -> usize {
        self.doc_term_freqs.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.doc_term_freqs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_strips_punctuation() {
        let tokens = tokenize("Invoice No: FV/2025/01/0847, due (March).");
        assert_eq!(tokens, vec!["invoice", "no", "fv/2025/01/0847", "due", "march"]);
    }

    #[test]
    fn test_tokenize_drops_empty_tokens() {
        let tokens = tokenize("... , ()  word");
        assert_eq!(tokens, vec!["word"]);
    }

    #[test]
    fn test_exact_term_match_ranks_highest() {
        let index = Bm25Index::build(&[
            "Invoice No: FV/2025/01/0847",
            "Payment terms are net thirty days",
            "The office address is in Warsaw",
        ]);

        let scores = index.score_query("invoice number FV/2025/01/0847");
        assert!(scores[0] > scores[1]);
        assert!(scores[0] > scores[2]);
    }

    #[test]
    fn test_no_shared_terms_scores_zero() {
        let index = Bm25Index::build(&["alpha beta gamma", "delta epsilon"]);
        let scores = index.score_query("unrelated query words");
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_query_scores_all_zero() {
        let index = Bm25Index::build(&["alpha beta", "gamma delta"]);
        let scores = index.score_query("");
        assert_eq!(scores, vec![0.0, 0.0]);
    }

    #[test]
    fn test_query_tokenization_matches_corpus_tokenization() {
        // "Warsaw." in the corpus must match "warsaw" in the query
        let index = Bm25Index::build(&["The office is in Warsaw."]);
        let scores = index.score_query("WARSAW");
        assert!(scores[0] > 0.0);
    }

    #[test]
    fn test_ubiquitous_term_gets_floored_idf() {
        // "the" appears in every document; its IDF would be negative without
        // the floor, which would let common words push scores below zero
        let index = Bm25Index::build(&["the alpha", "the beta", "the gamma"]);
        let scores = index.score_query("the");
        assert!(scores.iter().all(|s| *s >= 0.0));
    }

    #[test]
    fn test_empty_corpus() {
        let index = Bm25Index::build(&[]);
        assert!(index.is_empty());
        assert!(index.score_query("anything").is_empty());
    }
}
