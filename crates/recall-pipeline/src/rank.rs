use recall_core::types::{Candidate, ScoredResult};
use recall_core::RankingConfig;

/// Cosine similarity; 0.0 when either side has zero norm.
///
/// Accumulates in `f64` so any finite `f32` input neither overflows nor
/// underflows the norms. The result is never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vector dimensions must match");
    let (mut dot, mut na, mut nb) = (0f64, 0f64, 0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 { return 0.0; }
    let score = dot / (na.sqrt() * nb.sqrt());
    if score.is_finite() { score as f32 } else { 0.0 }
}

/// Score every candidate, sort by descending score (stable, so ties keep
/// candidate order), drop scores below the threshold, then keep `top_k`.
pub fn rank(query: &[f32], candidates: Vec<Candidate>, config: &RankingConfig) -> Vec<ScoredResult> {
    let mut scored: Vec<(f32, Candidate)> =
        candidates.into_iter().map(|c| (cosine_similarity(query, &c.vector), c)).collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .filter(|(score, _)| *score >= config.similarity_threshold)
        .take(config.top_k)
        .enumerate()
        .map(|(i, (score, c))| ScoredResult { document: c.document, chunk_text: c.chunk_text, score, rank: i + 1 })
        .collect()
}
