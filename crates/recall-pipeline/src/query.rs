use tracing::{debug, info};

use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, VectorStore};
use recall_core::types::QueryResponse;
use recall_core::RetrievalConfig;

use crate::rank::rank;

/// Embed `query_text`, score it against every stored chunk and return the
/// ranked, threshold-filtered hits. Read-only.
///
/// Only the empty string is rejected. Whitespace-only text embeds as the zero
/// vector, scores 0.0 everywhere and normally comes back insufficient.
pub fn query<S, E>(store: &S, embedder: &E, config: &RetrievalConfig, query_text: &str) -> Result<QueryResponse>
where
    S: VectorStore,
    E: Embedder + ?Sized,
{
    if query_text.is_empty() {
        return Err(Error::EmptyQuery);
    }
    config.validate()?;
    let label = query_label(query_text);
    let query_vec = embedder.embed(query_text).map_err(|e| e.with_context(format!("query '{label}': embed")))?;
    let candidates = store
        .fetch_candidates()
        .map_err(|e| e.with_context(format!("query '{label}': fetch candidates")))?;
    let total = candidates.len();
    let results = rank(&query_vec, candidates, &config.ranking());
    debug!(candidates = total, results = results.len(), "ranked candidates");
    if results.is_empty() {
        info!(query = query_text, "no chunk above similarity threshold");
    }
    Ok(QueryResponse { query: query_text.to_string(), results })
}

const QUERY_LABEL_CHARS: usize = 40;

/// The query as it appears in error contexts, cut to `QUERY_LABEL_CHARS`.
fn query_label(query_text: &str) -> String {
    let mut label: String = query_text.chars().take(QUERY_LABEL_CHARS).collect();
    if query_text.chars().nth(QUERY_LABEL_CHARS).is_some() {
        label.push_str("...");
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_are_kept_whole() {
        assert_eq!(query_label("rust engineer"), "rust engineer");
        assert_eq!(query_label(&"x".repeat(40)), "x".repeat(40));
    }

    #[test]
    fn long_queries_are_cut_on_char_boundaries() {
        let long = "é".repeat(50);
        assert_eq!(query_label(&long), format!("{}...", "é".repeat(40)));
    }
}
