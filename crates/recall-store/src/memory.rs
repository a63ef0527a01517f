use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use recall_core::error::{Error, Result};
use recall_core::traits::{StoreTransaction, VectorStore};
use recall_core::types::{Candidate, Document, DocumentId, DocumentRef};

/// One persisted chunk row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub document_id: DocumentId,
    pub chunk_text: String,
    pub vector: Vec<f32>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct StoreState {
    pub(crate) documents: Vec<Document>,
    pub(crate) chunks: Vec<StoredChunk>,
}

pub struct InMemoryStore {
    pub(crate) dimension: usize,
    pub(crate) state: RwLock<StoreState>,
    pub(crate) next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new(dimension: usize) -> Self {
        Self { dimension, state: RwLock::new(StoreState::default()), next_id: AtomicU64::new(1) }
    }

    pub fn dimension(&self) -> usize { self.dimension }

    pub fn document(&self, id: DocumentId) -> Option<Document> {
        self.state.read().documents.iter().find(|d| d.id == id).cloned()
    }

    pub fn documents(&self) -> Vec<Document> { self.state.read().documents.clone() }

    pub fn document_count(&self) -> usize { self.state.read().documents.len() }

    pub fn chunk_count(&self) -> usize { self.state.read().chunks.len() }

    fn check_vector(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dimension {
            return Err(Error::store(
                "insert",
                format!("dimension mismatch: expected {}, got {}", self.dimension, vector.len()),
            ));
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(Error::store("insert", "vector contains NaN or infinite components"));
        }
        Ok(())
    }
}

impl VectorStore for InMemoryStore {
    type Transaction<'a> = MemoryTransaction<'a>;

    fn begin(&self) -> Result<MemoryTransaction<'_>> {
        Ok(MemoryTransaction { store: self, documents: Vec::new(), chunks: Vec::new(), finished: false })
    }

    fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let state = self.state.read();
        let labels: HashMap<DocumentId, &str> =
            state.documents.iter().map(|d| (d.id, d.source_label.as_str())).collect();
        state
            .chunks
            .iter()
            .map(|row| {
                let label = labels.get(&row.document_id).ok_or_else(|| {
                    Error::store("fetch_candidates", format!("chunk references missing document {}", row.document_id))
                })?;
                Ok(Candidate {
                    vector: row.vector.clone(),
                    document: DocumentRef { id: row.document_id, source_label: (*label).to_string() },
                    chunk_text: row.chunk_text.clone(),
                })
            })
            .collect()
    }
}

/// Staged writes against an [`InMemoryStore`]. Nothing is visible to readers
/// until [`StoreTransaction::commit`]; dropping the transaction discards it.
pub struct MemoryTransaction<'a> {
    store: &'a InMemoryStore,
    documents: Vec<Document>,
    chunks: Vec<StoredChunk>,
    finished: bool,
}

impl MemoryTransaction<'_> {
    fn knows_document(&self, id: DocumentId) -> bool {
        self.documents.iter().any(|d| d.id == id) || self.store.state.read().documents.iter().any(|d| d.id == id)
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn create_document(&mut self, source_label: &str, full_text: &str) -> Result<DocumentId> {
        let id = DocumentId(self.store.next_id.fetch_add(1, Ordering::SeqCst));
        self.documents.push(Document { id, source_label: source_label.to_string(), text: full_text.to_string() });
        Ok(id)
    }

    fn insert(&mut self, document_id: DocumentId, chunk_text: &str, vector: &[f32]) -> Result<()> {
        self.store.check_vector(vector)?;
        if !self.knows_document(document_id) {
            return Err(Error::store("insert", format!("unknown document {document_id}")));
        }
        self.chunks.push(StoredChunk { document_id, chunk_text: chunk_text.to_string(), vector: vector.to_vec() });
        Ok(())
    }

    fn commit(mut self) -> Result<()> {
        let documents = std::mem::take(&mut self.documents);
        let chunks = std::mem::take(&mut self.chunks);
        let mut state = self.store.state.write();
        debug!(documents = documents.len(), chunks = chunks.len(), "committing transaction");
        state.documents.extend(documents);
        state.chunks.extend(chunks);
        self.finished = true;
        Ok(())
    }

    fn rollback(mut self) {
        self.discard();
    }
}

impl MemoryTransaction<'_> {
    fn discard(&mut self) {
        if !self.finished && (!self.documents.is_empty() || !self.chunks.is_empty()) {
            warn!(documents = self.documents.len(), chunks = self.chunks.len(), "rolling back transaction");
        }
        self.documents.clear();
        self.chunks.clear();
        self.finished = true;
    }
}

impl Drop for MemoryTransaction<'_> {
    fn drop(&mut self) { self.discard(); }
}
