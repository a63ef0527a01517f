//! recall-embed
//!
//! Deterministic hashing-trick embeddings: a term-frequency histogram over a
//! hashed vocabulary, L2-normalized. Identical text always yields a
//! bit-identical vector; text sharing vocabulary lands close under cosine
//! similarity.

mod normalize;
mod tokenize;

pub use normalize::{l2_norm, l2_normalize};
pub use tokenize::{bucket, tokenize};

use recall_core::error::{Error, Result};
use recall_core::traits::Embedder;
use recall_core::RetrievalConfig;
use tracing::warn;

pub struct HashingEmbedder { dim: usize }

impl HashingEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 { return Err(Error::InvalidConfiguration("embedding dimension must be > 0".into())); }
        Ok(Self { dim })
    }

    /// Never fails: blank text maps to the zero vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for word in tokenize(text) { v[bucket(&word, self.dim)] += 1.0; }
        l2_normalize(&mut v);
        v
    }

    /// Embed raw bytes. Input that is not valid UTF-8 cannot be tokenized and
    /// embeds as the zero vector.
    pub fn embed_bytes(&self, bytes: &[u8]) -> Vec<f32> {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.embed_text(text),
            Err(e) => {
                warn!(error = %e, len = bytes.len(), "input is not valid UTF-8, using zero vector");
                vec![0f32; self.dim]
            }
        }
    }
}

impl Embedder for HashingEmbedder {
    fn dim(&self) -> usize { self.dim }
    fn embed(&self, text: &str) -> Result<Vec<f32>> { Ok(self.embed_text(text)) }
}

pub fn get_default_embedder(config: &RetrievalConfig) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(HashingEmbedder::new(config.embedding_dimension)?))
}
