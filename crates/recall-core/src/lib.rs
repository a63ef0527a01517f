#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod traits;
pub mod types;

pub use chunker::chunk_text;
pub use config::{ChunkingConfig, RankingConfig, RetrievalConfig};
pub use error::{Error, Result};
