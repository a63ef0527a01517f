use crate::error::Result;
use crate::types::{Candidate, DocumentId};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed(&self, text: &str) -> Result<Vec<f32>> { (**self).embed(text) }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { (**self).embed_batch(texts) }
}

/// Backing store for documents and their chunk vectors.
///
/// Writes only happen inside a [`StoreTransaction`]; readers never observe a
/// document whose transaction has not committed.
pub trait VectorStore: Send + Sync {
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    fn begin(&self) -> Result<Self::Transaction<'_>>;

    /// Every stored chunk, in insertion order.
    fn fetch_candidates(&self) -> Result<Vec<Candidate>>;
}

/// One unit of work against a [`VectorStore`]. Dropping it without calling
/// [`StoreTransaction::commit`] discards everything written through it.
pub trait StoreTransaction {
    fn create_document(&mut self, source_label: &str, full_text: &str) -> Result<DocumentId>;
    fn insert(&mut self, document_id: DocumentId, chunk_text: &str, vector: &[f32]) -> Result<()>;
    fn commit(self) -> Result<()>;
    fn rollback(self);
}
