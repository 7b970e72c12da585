//! Post-generation contract validation
//!
//! The enforcer never fabricates a citation or rewrites the generator's
//! text. It only validates and flags: defects are data for the evaluation
//! layer, not silently corrected, preserving an honest signal of generator
//! quality.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::grounding::{Answer, ABSTENTION_PHRASE};
use crate::store::Passage;

/// A detected grounding defect in a generated answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Defect {
    /// Citation quote is not a literal substring of the cited passage
    UnverifiableQuote { passage_id: String, quote: String },
    /// Citation references a passage not in the retrieved set
    UnknownPassage { passage_id: String },
    /// Sufficient context claimed but no citations attached
    MissingCitations,
    /// Insufficient context claimed but quoted citations attached
    InconsistentAbstention,
    /// Insufficient context claimed without an explicit abstention statement
    MissingAbstentionPhrase,
    /// Generator output failed to parse even after the corrective retry
    MalformedOutput { raw: String },
}

impl fmt::Display for Defect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Defect::UnverifiableQuote { passage_id, .. } => {
                write!(f, "quote not found in passage {}", passage_id)
            }
            Defect::UnknownPassage { passage_id } => {
                write!(f, "citation references unknown passage {}", passage_id)
            }
            Defect::MissingCitations => write!(f, "answer claims sufficient context but cites nothing"),
            Defect::InconsistentAbstention => {
                write!(f, "abstention declared but quoted citations attached")
            }
            Defect::MissingAbstentionPhrase => {
                write!(f, "abstention declared without an explicit no-information statement")
            }
            Defect::MalformedOutput { .. } => write!(f, "generator output was malformed"),
        }
    }
}

/// Validates generated answers against the grounding contract
pub struct ContractEnforcer {
    abstention_phrase: String,
}

impl ContractEnforcer {
    /// Create an enforcer using the standard abstention phrase
    pub fn new() -> Self {
        Self {
            abstention_phrase: ABSTENTION_PHRASE.to_string(),
        }
    }

    /// Create an enforcer recognizing a custom abstention phrase
    pub fn with_abstention_phrase(phrase: &str) -> Self {
        Self {
            abstention_phrase: phrase.to_string(),
        }
    }

    /// Check an answer against the passages it was generated from
    ///
    /// Returns every detected defect; an empty list means the contract was
    /// honored in every checkable way. Claim-level support is a soft
    /// invariant left to the evaluation rubric.
    pub fn validate(&self, answer: &Answer, passages: &[Passage]) -> Vec<Defect> {
        let mut defects = Vec::new();

        let by_id: HashMap<&str, &Passage> = passages
            .iter()
            .map(|p| (p.passage_id.as_str(), p))
            .collect();

        for citation in &answer.citations {
            if citation.quote.is_empty() {
                continue;
            }
            match by_id.get(citation.passage_id.as_str()) {
                None => defects.push(Defect::UnknownPassage {
                    passage_id: citation.passage_id.clone(),
                }),
                Some(passage) => {
                    if !passage.text.contains(&citation.quote) {
                        defects.push(Defect::UnverifiableQuote {
                            passage_id: citation.passage_id.clone(),
                            quote: citation.quote.clone(),
                        });
                    }
                }
            }
        }

        if answer.has_sufficient_context {
            if answer.citations.is_empty() {
                defects.push(Defect::MissingCitations);
            }
        } else {
            if answer.citations.iter().any(|c| !c.quote.is_empty()) {
                defects.push(Defect::InconsistentAbstention);
            }
            let text_lower = answer.text.to_lowercase();
            if !text_lower.contains(&self.abstention_phrase.to_lowercase()) {
                defects.push(Defect::MissingAbstentionPhrase);
            }
        }

        defects
    }
}

impl Default for ContractEnforcer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grounding::Citation;

    fn passage(id: &str, text: &str) -> Passage {
        Passage {
            passage_id: id.to_string(),
            document_id: "d1".to_string(),
            document_title: "Invoice".to_string(),
            page_number: Some(1),
            sequence_index: 0,
            text: text.to_string(),
        }
    }

    fn citation(passage_id: &str, quote: &str) -> Citation {
        Citation {
            document_id: "d1".to_string(),
            document_title: "Invoice".to_string(),
            page_number: Some(1),
            passage_id: passage_id.to_string(),
            quote: quote.to_string(),
        }
    }

    #[test]
    fn test_verbatim_quote_passes() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: "The invoice number is FV/2025/01/0847.".to_string(),
            citations: vec![citation("p42", "FV/2025/01/0847")],
            has_sufficient_context: true,
        };
        let passages = vec![passage("p42", "Invoice No: FV/2025/01/0847")];

        assert!(enforcer.validate(&answer, &passages).is_empty());
    }

    #[test]
    fn test_paraphrased_quote_is_flagged_not_dropped() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: "The invoice number is 0847.".to_string(),
            citations: vec![citation("p42", "the invoice is numbered 0847")],
            has_sufficient_context: true,
        };
        let passages = vec![passage("p42", "Invoice No: FV/2025/01/0847")];

        let defects = enforcer.validate(&answer, &passages);
        assert_eq!(defects.len(), 1);
        assert!(matches!(defects[0], Defect::UnverifiableQuote { .. }));
        // The citation itself is untouched
        assert_eq!(answer.citations.len(), 1);
    }

    #[test]
    fn test_unknown_passage_flagged() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: "Something.".to_string(),
            citations: vec![citation("p99", "anything")],
            has_sufficient_context: true,
        };
        let defects = enforcer.validate(&answer, &[passage("p42", "text")]);
        assert!(defects.contains(&Defect::UnknownPassage {
            passage_id: "p99".to_string()
        }));
    }

    #[test]
    fn test_sufficient_context_without_citations_flagged() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: "Unsupported claim.".to_string(),
            citations: Vec::new(),
            has_sufficient_context: true,
        };
        let defects = enforcer.validate(&answer, &[]);
        assert_eq!(defects, vec![Defect::MissingCitations]);
    }

    #[test]
    fn test_inconsistent_abstention_flagged() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: format!("{}.", ABSTENTION_PHRASE),
            citations: vec![citation("p42", "Invoice No")],
            has_sufficient_context: false,
        };
        let defects = enforcer.validate(&answer, &[passage("p42", "Invoice No: 123")]);
        assert!(defects.contains(&Defect::InconsistentAbstention));
    }

    #[test]
    fn test_abstention_with_empty_quotes_is_valid() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: format!("{}.", ABSTENTION_PHRASE),
            citations: vec![citation("p42", "")],
            has_sufficient_context: false,
        };
        assert!(enforcer.validate(&answer, &[passage("p42", "text")]).is_empty());
    }

    #[test]
    fn test_abstention_without_phrase_flagged() {
        let enforcer = ContractEnforcer::new();
        let answer = Answer {
            text: "I cannot help with that.".to_string(),
            citations: Vec::new(),
            has_sufficient_context: false,
        };
        let defects = enforcer.validate(&answer, &[]);
        assert_eq!(defects, vec![Defect::MissingAbstentionPhrase]);
    }

    #[test]
    fn test_clean_abstention_passes() {
        let enforcer = ContractEnforcer::new();
        assert!(enforcer.validate(&Answer::abstention(), &[]).is_empty());
    }

    #[test]
    fn test_custom_abstention_phrase() {
        let enforcer = ContractEnforcer::with_abstention_phrase("Brak informacji w dokumentach");
        let answer = Answer {
            text: "Brak informacji w dokumentach.".to_string(),
            citations: Vec::new(),
            has_sufficient_context: false,
        };
        assert!(enforcer.validate(&answer, &[]).is_empty());
    }
}
