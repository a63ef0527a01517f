//! Configuration loader, retrieval tunables and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nesting, e.g. `APP_RETRIEVAL__TOP_K=10`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`Config::load`] but resolves the TOML files inside `dir`.
    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => tracing::debug!(env = %env_name, "unrecognized RUST_ENV, skipping env overlay"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.retrieval()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Like [`Config::get`] but `Ok(None)` when `key` is absent. A value that
    /// is present but of the wrong type is still an error.
    pub fn get_optional<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        if !self.figment.contains(key) {
            return Ok(None);
        }
        self.get(key).map(Some)
    }

    /// The `[retrieval]` table layered over the built-in defaults, validated.
    pub fn retrieval(&self) -> anyhow::Result<RetrievalConfig> {
        let retrieval: RetrievalConfig = Figment::from(Serialized::default("retrieval", RetrievalConfig::default()))
            .merge(self.figment.clone())
            .extract_inner("retrieval")
            .map_err(|e| anyhow::anyhow!("Failed to get 'retrieval': {}", e))?;
        retrieval.validate()?;
        Ok(retrieval)
    }
}

/// Tunables for the whole retrieval pipeline. Passed explicitly into every
/// ingest/query call so callers can override per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Words per chunk.
    pub chunk_size: usize,
    /// Words shared by consecutive chunks.
    pub overlap: usize,
    pub embedding_dimension: usize,
    /// Maximum results per query.
    pub top_k: usize,
    /// Minimum score a result needs to be returned.
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { chunk_size: 200, overlap: 40, embedding_dimension: 128, top_k: 5, similarity_threshold: 0.05 }
    }
}

impl RetrievalConfig {
    pub fn validate(&self) -> Result<()> {
        self.chunking().validate()?;
        if self.embedding_dimension == 0 {
            return Err(Error::InvalidConfiguration("embedding_dimension must be > 0".into()));
        }
        if !self.similarity_threshold.is_finite() {
            return Err(Error::InvalidConfiguration(format!(
                "similarity_threshold must be finite, got {}",
                self.similarity_threshold
            )));
        }
        Ok(())
    }

    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig { chunk_size: self.chunk_size, overlap: self.overlap }
    }

    pub fn ranking(&self) -> RankingConfig {
        RankingConfig { top_k: self.top_k, similarity_threshold: self.similarity_threshold }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self { RetrievalConfig::default().chunking() }
}

impl ChunkingConfig {
    /// `chunk_size > 0` and `overlap < chunk_size`; otherwise the window
    /// cursor would never advance.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfiguration("chunk_size must be > 0".into()));
        }
        if self.overlap >= self.chunk_size {
            return Err(Error::InvalidConfiguration(format!(
                "overlap ({}) must be smaller than chunk_size ({})",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    pub fn stride(&self) -> usize { self.chunk_size - self.overlap }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankingConfig {
    pub top_k: usize,
    pub similarity_threshold: f32,
}

impl Default for RankingConfig {
    fn default() -> Self { RetrievalConfig::default().ranking() }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
