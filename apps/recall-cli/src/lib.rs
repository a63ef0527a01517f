//! `recall` command line front end: loads config, opens the snapshot-backed
//! store and dispatches to the ingest/query commands.

pub mod cli;
pub mod commands;
pub mod logging;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use recall_core::config::{resolve_with_base, Config};
use recall_embed::get_default_embedder;
use recall_pipeline::RetrievalEngine;
use recall_store::InMemoryStore;

use cli::{Cli, Command};

pub const DEFAULT_STORE_PATH: &str = "data/recall.json";

/// Engine plus everything the commands need to resolve paths and persist.
pub struct Session {
    pub engine: RetrievalEngine<InMemoryStore>,
    pub config: Config,
    pub config_dir: PathBuf,
    pub store_path: PathBuf,
}

impl Session {
    pub fn open(config_dir: &Path, store_override: Option<&Path>) -> anyhow::Result<Self> {
        let config = Config::load_from(config_dir)?;
        let retrieval = config.retrieval()?;
        let store_path = match store_override {
            Some(p) => p.to_path_buf(),
            None => {
                let p = config
                    .get_optional::<String>("data.store_path")?
                    .unwrap_or_else(|| DEFAULT_STORE_PATH.to_string());
                resolve_with_base(config_dir, p)
            }
        };
        debug!(store = %store_path.display(), ?retrieval, "opening store");
        let store = InMemoryStore::open_or_create(&store_path, retrieval.embedding_dimension)?;
        let embedder = get_default_embedder(&retrieval)?;
        let engine = RetrievalEngine::new(store, embedder, retrieval)?;
        Ok(Self { engine, config, config_dir: config_dir.to_path_buf(), store_path })
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.engine.store().save_snapshot(&self.store_path)?;
        Ok(())
    }
}

/// Run a parsed command line, writing user-facing output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    let session = Session::open(&cli.config_dir, cli.store.as_deref())?;
    match cli.command {
        Command::Ingest { file, label } => commands::ingest(&session, &file, label.as_deref(), out),
        Command::IngestDir { dir } => commands::ingest_dir(&session, dir.as_deref(), out),
        Command::Query { text, top_k, threshold, json } => {
            commands::query(&session, &text, top_k, threshold, json, out)
        }
        Command::Stats => commands::stats(&session, out),
    }
}
