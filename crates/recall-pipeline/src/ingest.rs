use tracing::{debug, info, warn};

use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, StoreTransaction, VectorStore};
use recall_core::types::{Chunk, DocumentId};
use recall_core::{chunk_text, RetrievalConfig};

/// Chunk, embed and store one document as a single transaction.
///
/// Either the document record and every chunk are committed, or nothing is:
/// any failure rolls the transaction back and is returned with the document
/// label and failing step in its context.
pub fn ingest<S, E>(
    store: &S,
    embedder: &E,
    config: &RetrievalConfig,
    document_text: &str,
    source_label: &str,
) -> Result<DocumentId>
where
    S: VectorStore,
    E: Embedder + ?Sized,
{
    if document_text.trim().is_empty() {
        return Err(Error::EmptyDocument { source_label: source_label.to_string() });
    }
    config.validate()?;
    let chunks = chunk_text(document_text, &config.chunking())?;

    let mut tx = store.begin().map_err(|e| e.with_context(format!("ingest '{source_label}': begin")))?;
    match stage_document(&mut tx, embedder, &chunks, document_text, source_label) {
        Ok(document_id) => {
            tx.commit().map_err(|e| e.with_context(format!("ingest '{source_label}': commit")))?;
            info!(source_label, %document_id, chunks = chunks.len(), "ingested document");
            Ok(document_id)
        }
        Err(e) => {
            warn!(source_label, error = %e, "ingest failed, rolling back");
            tx.rollback();
            Err(e)
        }
    }
}

fn stage_document<T, E>(
    tx: &mut T,
    embedder: &E,
    chunks: &[Chunk],
    document_text: &str,
    source_label: &str,
) -> Result<DocumentId>
where
    T: StoreTransaction,
    E: Embedder + ?Sized,
{
    let document_id = tx
        .create_document(source_label, document_text)
        .map_err(|e| e.with_context(format!("ingest '{source_label}': create document")))?;
    for (i, chunk) in chunks.iter().enumerate() {
        let vector = embedder
            .embed(&chunk.text)
            .map_err(|e| e.with_context(format!("ingest '{source_label}': embed chunk {i}")))?;
        tx.insert(document_id, &chunk.text, &vector)
            .map_err(|e| e.with_context(format!("ingest '{source_label}': insert chunk {i}")))?;
        debug!(source_label, chunk = i, words = chunk.word_count(), "staged chunk");
    }
    Ok(document_id)
}
