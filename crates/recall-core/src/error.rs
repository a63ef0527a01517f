use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Document '{source_label}' has no text to ingest")]
    EmptyDocument { source_label: String },

    #[error("Query text is empty")]
    EmptyQuery,

    #[error("Store failure ({context}): {reason}")]
    StoreFailure { context: String, reason: String },

    #[error("Embedding failed: {0}")]
    EmbeddingFailure(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn store(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreFailure { context: context.into(), reason: reason.into() }
    }

    /// Prefix the context of a store or embedding failure with the caller's
    /// step (e.g. `ingest 'cv.txt': insert chunk 3`). Other kinds pass through.
    #[must_use]
    pub fn with_context(self, outer: impl AsRef<str>) -> Self {
        let outer = outer.as_ref();
        match self {
            Self::StoreFailure { context, reason } => {
                Self::StoreFailure { context: format!("{outer}: {context}"), reason }
            }
            Self::EmbeddingFailure(reason) => Self::EmbeddingFailure(format!("{outer}: {reason}")),
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self { Self::Serialization(e.to_string()) }
}

pub type Result<T> = std::result::Result<T, Error>;
