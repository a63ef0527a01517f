use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use recall_core::config::resolve_with_base;
use recall_core::data_processor::DataProcessor;
use recall_core::types::INSUFFICIENT_INFORMATION;
use recall_core::RetrievalConfig;

use crate::Session;

pub fn ingest(session: &Session, file: &Path, label: Option<&str>, out: &mut dyn Write) -> anyhow::Result<()> {
    let document = DataProcessor::new()
        .load_file(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let label = label.unwrap_or(&document.source_label);
    let before = session.engine.store().chunk_count();
    let id = session.engine.ingest(&document.text, label)?;
    session.save()?;
    let chunks = session.engine.store().chunk_count() - before;
    writeln!(out, "Ingested '{label}' as document {id} ({chunks} chunks)")?;
    Ok(())
}

pub fn ingest_dir(session: &Session, dir: Option<&Path>, out: &mut dyn Write) -> anyhow::Result<()> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => {
            let raw: String = session
                .config
                .get("data.raw_txt_dir")
                .context("no directory given and data.raw_txt_dir is not configured")?;
            resolve_with_base(&session.config_dir, raw)
        }
    };
    let documents = DataProcessor::new().load_directory(&dir)?;
    if documents.is_empty() {
        writeln!(out, "No .txt files found in {}", dir.display())?;
        return Ok(());
    }

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
            .progress_chars("#>-"),
    );
    let before = session.engine.store().chunk_count();
    let mut skipped: Vec<(PathBuf, String)> = Vec::new();
    for document in &documents {
        pb.set_message(document.source_label.clone());
        if let Err(e) = session.engine.ingest(&document.text, &document.source_label) {
            warn!(file = %document.path.display(), error = %e, "skipping document");
            skipped.push((document.path.clone(), e.to_string()));
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let ingested = documents.len() - skipped.len();
    if ingested > 0 {
        session.save()?;
    }
    for (path, reason) in &skipped {
        writeln!(out, "Skipped {}: {reason}", path.display())?;
    }
    let chunks = session.engine.store().chunk_count() - before;
    writeln!(
        out,
        "Ingested {ingested} of {} documents ({chunks} chunks) from {}",
        documents.len(),
        dir.display()
    )?;
    Ok(())
}

pub fn query(
    session: &Session,
    text: &str,
    top_k: Option<usize>,
    threshold: Option<f32>,
    json: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let defaults = session.engine.config();
    let config = RetrievalConfig {
        top_k: top_k.unwrap_or(defaults.top_k),
        similarity_threshold: threshold.unwrap_or(defaults.similarity_threshold),
        ..defaults.clone()
    };
    let response = session.engine.query_with(text, &config)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&response.to_json())?)?;
        return Ok(());
    }
    if response.is_insufficient() {
        writeln!(out, "{INSUFFICIENT_INFORMATION}")?;
        return Ok(());
    }
    for hit in &response.results {
        writeln!(out, "{}. [{:.4}] {}", hit.rank, hit.score, hit.document.source_label)?;
        writeln!(out, "   {}", hit.chunk_text)?;
    }
    Ok(())
}

pub fn stats(session: &Session, out: &mut dyn Write) -> anyhow::Result<()> {
    let store = session.engine.store();
    writeln!(out, "store: {}", session.store_path.display())?;
    writeln!(out, "documents: {}", store.document_count())?;
    writeln!(out, "chunks: {}", store.chunk_count())?;
    writeln!(out, "dimension: {}", store.dimension())?;
    Ok(())
}
