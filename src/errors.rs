use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioRagError {
    #[error("Vectorizer fit error: {0}")]
    Fit(String),

    #[error("Vector index has not been built or loaded")]
    IndexNotReady,

    #[error("Snapshot persistence error: {0}")]
    Persistence(String),

    #[error("Failed to read corpus source '{path}': {source}")]
    SourceRead {
        path: String,
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FolioRagError>;
