//! Domain types shared by the chunker, embedders, stores and pipelines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message reported when no stored chunk clears the similarity threshold.
pub const INSUFFICIENT_INFORMATION: &str = "I don't have enough information to answer that.";

/// Store-assigned document identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// A document as held by the document store.
///
/// - `source_label`: human-readable origin (file stem, "Name (email)", ...)
/// - `text`: the full extracted text the chunks were drawn from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub source_label: String,
    pub text: String,
}

/// The part of a document a result points back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub source_label: String,
}

/// A contiguous word window of a document.
///
/// `start_word_index` is inclusive, `end_word_index` exclusive; `text` is the
/// words of that range joined by single spaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub start_word_index: usize,
    pub end_word_index: usize,
    pub text: String,
}

impl Chunk {
    pub fn word_count(&self) -> usize { self.end_word_index - self.start_word_index }
}

/// A stored (vector, payload) pair handed to the ranker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub vector: Vec<f32>,
    pub document: DocumentRef,
    pub chunk_text: String,
}

/// One ranked hit. `rank` is 1-based; higher `score` is always better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub document: DocumentRef,
    pub chunk_text: String,
    pub score: f32,
    pub rank: usize,
}

/// Outcome of a query. An empty `results` list is the normal
/// "insufficient information" answer, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub query: String,
    pub results: Vec<ScoredResult>,
}

impl QueryResponse {
    pub fn is_insufficient(&self) -> bool { self.results.is_empty() }

    pub fn answer(&self) -> Option<&'static str> {
        self.is_insufficient().then_some(INSUFFICIENT_INFORMATION)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let sources: Vec<serde_json::Value> = self
            .results
            .iter()
            .map(|r| {
                serde_json::json!({
                    "source": r.document.source_label,
                    "content": r.chunk_text,
                    "similarity": r.score,
                })
            })
            .collect();
        let mut out = serde_json::json!({ "query": self.query, "sources": sources });
        if let Some(answer) = self.answer() {
            out["answer"] = serde_json::Value::from(answer);
        }
        out
    }
}
