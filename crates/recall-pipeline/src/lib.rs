//! recall-pipeline
//!
//! Ingestion (chunk → embed → store) and query (embed → fetch → rank)
//! orchestration over the `VectorStore` and `Embedder` collaborators.

pub mod ingest;
pub mod query;
pub mod rank;

pub use ingest::ingest;
pub use query::query;
pub use rank::{cosine_similarity, rank};

use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, VectorStore};
use recall_core::types::{DocumentId, QueryResponse};
use recall_core::RetrievalConfig;

pub struct RetrievalEngine<S, E = Box<dyn Embedder>> where S: VectorStore, E: Embedder {
    store: S,
    embedder: E,
    config: RetrievalConfig,
}

impl<S, E> RetrievalEngine<S, E> where S: VectorStore, E: Embedder {
    pub fn new(store: S, embedder: E, config: RetrievalConfig) -> Result<Self> {
        check_config(&embedder, &config)?;
        Ok(Self { store, embedder, config })
    }

    pub fn ingest(&self, document_text: &str, source_label: &str) -> Result<DocumentId> {
        ingest::ingest(&self.store, &self.embedder, &self.config, document_text, source_label)
    }

    pub fn query(&self, query_text: &str) -> Result<QueryResponse> {
        query::query(&self.store, &self.embedder, &self.config, query_text)
    }

    /// Query with per-call overrides (e.g. a different `top_k` or threshold).
    pub fn query_with(&self, query_text: &str, config: &RetrievalConfig) -> Result<QueryResponse> {
        check_config(&self.embedder, config)?;
        query::query(&self.store, &self.embedder, config, query_text)
    }

    pub fn store(&self) -> &S { &self.store }

    pub fn config(&self) -> &RetrievalConfig { &self.config }

    pub fn into_store(self) -> S { self.store }
}

fn check_config<E: Embedder>(embedder: &E, config: &RetrievalConfig) -> Result<()> {
    config.validate()?;
    if embedder.dim() != config.embedding_dimension {
        return Err(Error::InvalidConfiguration(format!(
            "embedder produces {} dimensions, config expects {}",
            embedder.dim(),
            config.embedding_dimension
        )));
    }
    Ok(())
}
