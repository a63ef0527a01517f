use std::hash::Hasher;
use twox_hash::XxHash64;

/// Lower-cased whitespace-delimited words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase().split_whitespace().map(str::to_owned).collect()
}

/// Dimension a word lands in: XxHash64 (seed 0) of its UTF-8 bytes modulo `dim`.
///
/// Seeded explicitly and fed raw bytes so the bucket is identical across runs,
/// processes and platforms.
pub fn bucket(word: &str, dim: usize) -> usize {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(word.as_bytes());
    (hasher.finish() % dim as u64) as usize
}
