//! Passage store interface
//!
//! The chunk store itself (document upload, PDF extraction, persistence) is an
//! external collaborator. This module defines the read-only view the retrieval
//! core consumes: immutable passages with stable identity and positional
//! metadata, plus an in-memory implementation backed by a JSON file for tests
//! and the CLI.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::{DocAnchorError, Result};

/// An immutable unit of retrievable evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Unique identifier, stable across retrieval calls within a session
    pub passage_id: String,
    /// Source document identifier
    pub document_id: String,
    /// Human-readable document title, carried into citations
    pub document_title: String,
    /// Page number in the source document, if known
    pub page_number: Option<u32>,
    /// Position within the document, monotonically increasing per document
    pub sequence_index: usize,
    /// Raw passage text, never empty
    pub text: String,
}

impl Passage {
    /// Approximate token count (whitespace heuristic)
    pub fn token_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Check the per-passage invariants
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(DocAnchorError::InvalidPassage {
                passage_id: self.passage_id.clone(),
                reason: "text must not be empty".to_string(),
            });
        }
        if self.passage_id.trim().is_empty() {
            return Err(DocAnchorError::InvalidPassage {
                passage_id: self.passage_id.clone(),
                reason: "passage_id must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Read-only access to the candidate passages for a query scope
pub trait PassageStore: Send + Sync {
    /// All candidate passages; an empty result is valid and yields an empty
    /// ranked list downstream, never an error
    fn candidates(&self) -> Result<Vec<Passage>>;

    /// Candidates restricted to one document
    fn candidates_for_document(&self, document_id: &str) -> Result<Vec<Passage>> {
        Ok(self
            .candidates()?
            .into_iter()
            .filter(|p| p.document_id == document_id)
            .collect())
    }
}

/// In-memory passage store, loaded once and immutable thereafter
pub struct InMemoryStore {
    passages: Vec<Passage>,
}

impl InMemoryStore {
    /// Create a store from already-built passages, checking invariants
    pub fn new(passages: Vec<Passage>) -> Result<Self> {
        for passage in &passages {
            passage.validate()?;
        }

        // sequence_index must increase within each document
        let mut last_index: HashMap<&str, usize> = HashMap::new();
        for passage in &passages {
            if let Some(prev) = last_index.get(passage.document_id.as_str()) {
                if passage.sequence_index <= *prev {
                    return Err(DocAnchorError::InvalidPassage {
                        passage_id: passage.passage_id.clone(),
                        reason: format!(
                            "sequence_index {} not increasing after {} in document {}",
                            passage.sequence_index, prev, passage.document_id
                        ),
                    });
                }
            }
            last_index.insert(passage.document_id.as_str(), passage.sequence_index);
        }

        Ok(Self { passages })
    }

    /// Load passages from a JSON array file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let passages: Vec<Passage> = serde_json::from_str(&contents)?;
        Self::new(passages)
    }

    /// Number of passages held
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

impl PassageStore for InMemoryStore {
    fn candidates(&self) -> Result<Vec<Passage>> {
        Ok(self.passages.clone())
    }
}
