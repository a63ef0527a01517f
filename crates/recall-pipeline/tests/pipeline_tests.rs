use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, StoreTransaction, VectorStore};
use recall_core::types::{Candidate, DocumentId};
use recall_core::RetrievalConfig;
use recall_embed::{get_default_embedder, HashingEmbedder};
use recall_pipeline::{ingest, query, RetrievalEngine};
use recall_store::{InMemoryStore, MemoryTransaction};

const CV: &str = "Jane Doe is a senior Rust engineer with ten years of experience building \
    distributed storage systems. She led the migration of a payment ledger to an event sourced \
    architecture and mentors junior developers. Outside work she maintains an open source \
    parser combinator library and speaks at systems conferences about async runtimes.";

fn small_config() -> RetrievalConfig {
    RetrievalConfig { chunk_size: 12, overlap: 3, ..RetrievalConfig::default() }
}

fn engine() -> RetrievalEngine<InMemoryStore> {
    let config = small_config();
    let embedder = get_default_embedder(&config).unwrap();
    RetrievalEngine::new(InMemoryStore::new(config.embedding_dimension), embedder, config).unwrap()
}

/// Wraps the in-memory store and fails the n-th chunk insert (0-based) of
/// any transaction, or the commit.
struct FlakyStore {
    inner: InMemoryStore,
    fail_insert_at: Option<usize>,
    fail_commit: bool,
}

struct FlakyTransaction<'a> {
    inner: MemoryTransaction<'a>,
    inserts: usize,
    fail_insert_at: Option<usize>,
    fail_commit: bool,
}

impl VectorStore for FlakyStore {
    type Transaction<'a> = FlakyTransaction<'a>;

    fn begin(&self) -> Result<FlakyTransaction<'_>> {
        Ok(FlakyTransaction {
            inner: self.inner.begin()?,
            inserts: 0,
            fail_insert_at: self.fail_insert_at,
            fail_commit: self.fail_commit,
        })
    }

    fn fetch_candidates(&self) -> Result<Vec<Candidate>> { self.inner.fetch_candidates() }
}

impl StoreTransaction for FlakyTransaction<'_> {
    fn create_document(&mut self, source_label: &str, full_text: &str) -> Result<DocumentId> {
        self.inner.create_document(source_label, full_text)
    }

    fn insert(&mut self, document_id: DocumentId, chunk_text: &str, vector: &[f32]) -> Result<()> {
        if Some(self.inserts) == self.fail_insert_at {
            return Err(Error::store("insert", "connection reset"));
        }
        self.inserts += 1;
        self.inner.insert(document_id, chunk_text, vector)
    }

    fn commit(self) -> Result<()> {
        if self.fail_commit {
            return Err(Error::store("commit", "serialization failure"));
        }
        self.inner.commit()
    }

    fn rollback(self) { self.inner.rollback() }
}

struct FailingEmbedder { calls: AtomicUsize, fail_on: usize }

impl Embedder for FailingEmbedder {
    fn dim(&self) -> usize { 128 }
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.fail_on {
            return Err(Error::EmbeddingFailure("model unavailable".into()));
        }
        Ok(HashingEmbedder::new(128)?.embed_text(text))
    }
}

#[test]
fn verbatim_chunk_comes_back_first_with_similarity_one() {
    let engine = engine();
    let id = engine.ingest(CV, "Jane Doe (jane@example.com)").unwrap();
    engine.ingest("Bob bakes sourdough bread and grows tomatoes in his garden every summer.", "Bob").unwrap();

    let chunk = engine.store().fetch_candidates().unwrap()[1].chunk_text.clone();
    let response = engine.query(&chunk).unwrap();
    assert!(!response.is_insufficient());
    let top = &response.results[0];
    assert_eq!(top.chunk_text, chunk);
    assert_eq!(top.document.id, id);
    assert_eq!(top.document.source_label, "Jane Doe (jane@example.com)");
    assert!((top.score - 1.0).abs() < 1e-5, "score={}", top.score);
    assert_eq!(top.rank, 1);
    assert!(response.results.len() <= 5);
}

#[test]
fn ingest_stores_every_chunk_of_the_document() {
    let engine = engine();
    let id = engine.ingest(CV, "jane").unwrap();
    let expected = recall_core::chunk_text(CV, &small_config().chunking()).unwrap();
    let stored = engine.store().fetch_candidates().unwrap();
    assert_eq!(stored.len(), expected.len());
    for (c, e) in stored.iter().zip(&expected) {
        assert_eq!(c.chunk_text, e.text);
        assert_eq!(c.document.id, id);
    }
    assert_eq!(engine.store().document(id).unwrap().text, CV);
}

#[test]
fn empty_store_returns_empty_results() {
    let response = engine().query("rust engineer").unwrap();
    assert!(response.results.is_empty());
    assert!(response.is_insufficient());
    assert_eq!(response.answer(), Some(recall_core::types::INSUFFICIENT_INFORMATION));
}

#[test]
fn unrelated_query_is_insufficient_not_an_error() {
    let engine = engine();
    engine.ingest("alpha beta gamma delta", "greek").unwrap();
    let response = engine.query("zzzz-unrelated-token").unwrap();
    assert!(response.results.iter().all(|r| r.score >= 0.05));
    let strict = RetrievalConfig { similarity_threshold: 1.01, ..small_config() };
    let response = engine.query_with("alpha beta gamma delta", &strict).unwrap();
    assert!(response.is_insufficient());
}

#[test]
fn validation_errors() {
    let engine = engine();
    assert!(matches!(engine.ingest("  \n\t", "blank"), Err(Error::EmptyDocument { source_label }) if source_label == "blank"));
    assert!(matches!(engine.query(""), Err(Error::EmptyQuery)));
    assert_eq!(engine.store().document_count(), 0);

    let bad = RetrievalConfig { chunk_size: 4, overlap: 4, ..RetrievalConfig::default() };
    let store = InMemoryStore::new(128);
    let embedder = HashingEmbedder::new(128).unwrap();
    assert!(matches!(ingest(&store, &embedder, &bad, "a b c", "x"), Err(Error::InvalidConfiguration(_))));

    let mismatched = RetrievalConfig { embedding_dimension: 64, ..RetrievalConfig::default() };
    assert!(matches!(
        RetrievalEngine::new(InMemoryStore::new(64), embedder, mismatched),
        Err(Error::InvalidConfiguration(_))
    ));
}

#[test]
fn whitespace_query_is_insufficient_not_an_error() {
    let engine = engine();
    engine.ingest(CV, "jane").unwrap();
    for blank in ["   ", "\n\t "] {
        let response = engine.query(blank).unwrap();
        assert_eq!(response.query, blank);
        assert!(response.is_insufficient());
        assert_eq!(response.answer(), Some(recall_core::types::INSUFFICIENT_INFORMATION));
    }
}

#[test]
fn failed_query_embedding_names_the_query() {
    let store = InMemoryStore::new(128);
    let embedder = FailingEmbedder { calls: AtomicUsize::new(0), fail_on: 0 };
    let err = query(&store, &embedder, &small_config(), "who knows kubernetes").unwrap_err();
    assert!(
        matches!(err, Error::EmbeddingFailure(ref m) if m.contains("who knows kubernetes") && m.contains("embed")),
        "{err}"
    );
}

#[test]
fn failed_insert_rolls_back_whole_document() {
    let store = FlakyStore { inner: InMemoryStore::new(128), fail_insert_at: Some(2), fail_commit: false };
    let embedder = HashingEmbedder::new(128).unwrap();
    let err = ingest(&store, &embedder, &small_config(), CV, "jane").unwrap_err();
    match err {
        Error::StoreFailure { context, .. } => {
            assert!(context.contains("jane"), "{context}");
            assert!(context.contains("insert chunk 2"), "{context}");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(store.inner.document_count(), 0);
    assert_eq!(store.inner.chunk_count(), 0);
}

#[test]
fn failed_commit_leaves_store_untouched() {
    let store = FlakyStore { inner: InMemoryStore::new(128), fail_insert_at: None, fail_commit: true };
    let embedder = HashingEmbedder::new(128).unwrap();
    let err = ingest(&store, &embedder, &small_config(), CV, "jane").unwrap_err();
    assert!(matches!(err, Error::StoreFailure { ref context, .. } if context.contains("commit")));
    assert_eq!(store.inner.document_count(), 0);
    assert_eq!(store.inner.chunk_count(), 0);
}

#[test]
fn failed_embedding_rolls_back_and_earlier_documents_survive() {
    let store = InMemoryStore::new(128);
    let embedder = FailingEmbedder { calls: AtomicUsize::new(0), fail_on: usize::MAX };
    ingest(&store, &embedder, &small_config(), "first document body", "first").unwrap();

    let embedder = FailingEmbedder { calls: AtomicUsize::new(0), fail_on: 1 };
    let err = ingest(&store, &embedder, &small_config(), CV, "second").unwrap_err();
    assert!(matches!(err, Error::EmbeddingFailure(ref m) if m.contains("second") && m.contains("embed chunk 1")));
    assert_eq!(store.document_count(), 1);
    assert!(store.fetch_candidates().unwrap().iter().all(|c| c.document.source_label == "first"));
}

#[test]
fn per_call_overrides_do_not_touch_engine_defaults() {
    let engine = engine();
    for i in 0..8 {
        engine.ingest(&format!("rust async runtime notes part {i}"), &format!("notes-{i}")).unwrap();
    }
    let narrow = RetrievalConfig { top_k: 2, ..small_config() };
    assert_eq!(engine.query_with("rust async runtime", &narrow).unwrap().results.len(), 2);
    assert_eq!(engine.query("rust async runtime").unwrap().results.len(), 5);
    assert_eq!(engine.config().top_k, 5);
}

#[test]
fn free_functions_match_engine() {
    let store = InMemoryStore::new(128);
    let embedder = HashingEmbedder::new(128).unwrap();
    let config = small_config();
    ingest(&store, &embedder, &config, CV, "jane").unwrap();
    let a = query(&store, &embedder, &config, "Rust engineer storage").unwrap();
    let engine = RetrievalEngine::new(store, embedder, config).unwrap();
    let b = engine.query("Rust engineer storage").unwrap();
    assert_eq!(a, b);
}

#[test]
fn concurrent_ingest_and_query() {
    let engine = Arc::new(engine());
    let handles: Vec<_> = (0..6)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                engine.ingest(&format!("{CV} document number {i}"), &format!("cv-{i}")).unwrap();
                engine.query("distributed storage").unwrap();
            })
        })
        .collect();
    for h in handles { h.join().unwrap(); }
    assert_eq!(engine.store().document_count(), 6);
    let response = engine.query("distributed storage systems").unwrap();
    assert_eq!(response.results.len(), 5);
}
