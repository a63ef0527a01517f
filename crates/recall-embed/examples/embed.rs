use recall_core::traits::Embedder;
use recall_embed::HashingEmbedder;

fn main() -> anyhow::Result<()> {
    let embedder = HashingEmbedder::new(128)?;
    let texts = vec!["hello world".to_string(), "rust embeddings".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    for (text, emb) in texts.iter().zip(&embs) {
        let active: Vec<usize> = (0..emb.len()).filter(|&i| emb[i] != 0.0).collect();
        println!("{text:?} -> dims {active:?}");
    }
    println!("B={} dim={}", embs.len(), embedder.dim());
    Ok(())
}
