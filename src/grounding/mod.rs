//! Grounded answer contract: structured answers, citations, abstention
//!
//! The generator may use only the supplied passages as fact source, must
//! cite every factual claim with an exact quoted substring, and must
//! abstain explicitly when the passages do not contain the answer.

pub mod context;
pub mod enforcer;

use serde::{Deserialize, Serialize};

pub use context::{build_context, build_prompt, corrective_instruction};
pub use enforcer::{ContractEnforcer, Defect};

/// Phrase a well-behaved generator uses when abstaining
pub const ABSTENTION_PHRASE: &str = "No information found in the documents";

/// A claim-to-evidence link produced by the answer generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub document_id: String,
    pub document_title: String,
    pub page_number: Option<u32>,
    pub passage_id: String,
    /// Verbatim substring expected to appear in the cited passage's text;
    /// empty only on the abstention path
    #[serde(default)]
    pub quote: String,
}

/// Structured output of the grounding-enforced generation step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text, or an explicit abstention statement
    #[serde(alias = "answer")]
    pub text: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
    pub has_sufficient_context: bool,
}

impl Answer {
    /// Abstention-shaped answer: no citations, explicit no-information text
    pub fn abstention() -> Self {
        Self {
            text: format!("{}.", ABSTENTION_PHRASE),
            citations: Vec::new(),
            has_sufficient_context: false,
        }
    }

    /// Whether this answer declares insufficient context
    pub fn is_abstention(&self) -> bool {
        !self.has_sufficient_context
    }
}
