//! Overlapping word-window chunking.

use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::types::Chunk;

/// Split `text` into windows of `chunk_size` whitespace-delimited words,
/// consecutive windows sharing `overlap` words.
///
/// Words keep their case and punctuation. Empty or whitespace-only text yields
/// no chunks. Production stops once a window reaches the last word, so the
/// final chunk may be shorter than `chunk_size` but never lies entirely inside
/// its predecessor.
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    config.validate()?;
    let words: Vec<&str> = text.split_whitespace().collect();
    let stride = config.stride();
    let mut chunks = Vec::with_capacity(words.len().div_ceil(stride));
    let mut start = 0;
    while start < words.len() {
        let end = (start + config.chunk_size).min(words.len());
        chunks.push(Chunk { start_word_index: start, end_word_index: end, text: words[start..end].join(" ") });
        if end >= words.len() { break; }
        start += stride;
    }
    Ok(chunks)
}
