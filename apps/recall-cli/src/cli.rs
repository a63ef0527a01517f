use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "recall", version, about = "Local document retrieval over hashed bag-of-words vectors")]
pub struct Cli {
    /// Directory holding config.toml (and config.<env>.toml).
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// Snapshot file; overrides `data.store_path`.
    #[arg(long, global = true, env = "RECALL_STORE")]
    pub store: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest a single text file.
    Ingest {
        file: PathBuf,
        /// Label stored with the document; defaults to the file stem.
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Ingest every .txt file under a directory (default `data.raw_txt_dir`).
    IngestDir { dir: Option<PathBuf> },

    /// Rank stored chunks against a question.
    Query {
        text: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        #[arg(short, long)]
        threshold: Option<f32>,
        /// Print the response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Document and chunk counts.
    Stats,
}
