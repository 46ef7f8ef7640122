use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; a single "*" entry allows any origin
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Path to the portfolio knowledge-base text file
    pub data_file: String,
    /// Directory holding the persisted index snapshot
    pub snapshot_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks fed into the chat prompt
    pub top_k: usize,
    /// Character budget for the assembled context block
    pub max_context_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub llm_endpoint: String,
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_repetition_penalty")]
    pub repetition_penalty: f32,
}

fn default_llm_model() -> String {
    "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string()
}

fn default_max_tokens() -> usize {
    150
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.8
}

fn default_repetition_penalty() -> f32 {
    1.2
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Messages kept per session before the oldest are dropped
    pub max_history: usize,
    /// Messages from the tail of the history included in each prompt
    pub context_limit: usize,
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,
}

fn default_session_timeout() -> u64 {
    3600
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Name the assistant speaks as
    pub name: String,
    /// Short role line, e.g. "a Data Scientist"
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub corpus: CorpusConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub memory: MemoryConfig,
    pub persona: PersonaConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let mut config: AppConfig = toml::from_str(&content)?;

        // The API key may come from the environment instead of the file
        if let Ok(key) = std::env::var("FOLIORAG_LLM_KEY") {
            config.llm.llm_key = key;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default config file path
    pub fn load() -> crate::Result<Self> {
        // Try to load from config.toml first, then fall back to config.example.toml
        if Path::new("config.toml").exists() {
            Self::from_file("config.toml")
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")
        } else {
            Err(crate::FolioRagError::Config(
                "No config file found. Please create config.toml or config.example.toml"
                    .to_string(),
            ))
        }
    }

    /// Validate cross-field constraints the rest of the system assumes
    fn validate(&self) -> crate::Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(crate::FolioRagError::Config(
                "chunking.chunk_size must be > 0".to_string(),
            ));
        }

        // The chunker advances by chunk_size - overlap; equal or larger
        // overlap would stall the window
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(crate::FolioRagError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(crate::FolioRagError::Config(
                "retrieval.top_k must be >= 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(crate::FolioRagError::Config(format!(
                "llm.temperature must be in [0.0, 2.0], got {}",
                self.llm.temperature
            )));
        }

        if self.memory.context_limit > self.memory.max_history {
            return Err(crate::FolioRagError::Config(format!(
                "memory.context_limit ({}) must not exceed memory.max_history ({})",
                self.memory.context_limit, self.memory.max_history
            )));
        }

        Ok(())
    }

    /// Get the corpus data file path
    pub fn data_file(&self) -> &str {
        &self.corpus.data_file
    }

    /// Get the snapshot directory
    pub fn snapshot_dir(&self) -> &str {
        &self.corpus.snapshot_dir
    }

    /// Get chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunking.chunk_size
    }

    /// Get chunk overlap in characters
    pub fn chunk_overlap(&self) -> usize {
        self.chunking.chunk_overlap
    }

    /// Get retrieval top-K
    pub fn top_k(&self) -> usize {
        self.retrieval.top_k
    }

    /// Get LLM endpoint
    pub fn llm_endpoint(&self) -> &str {
        &self.llm.llm_endpoint
    }

    /// Get LLM key
    pub fn llm_key(&self) -> &str {
        &self.llm.llm_key
    }

    /// Get LLM model
    pub fn llm_model(&self) -> &str {
        &self.llm.llm_model
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_origins: default_cors_origins(),
            },
            corpus: CorpusConfig {
                data_file: "portfolio_data.txt".to_string(),
                snapshot_dir: "./index_db".to_string(),
            },
            chunking: ChunkingConfig {
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            retrieval: RetrievalConfig {
                top_k: 3,
                max_context_length: 4000,
            },
            llm: LlmConfig {
                llm_endpoint: "https://api.together.xyz/v1".to_string(),
                llm_key: String::new(),
                llm_model: default_llm_model(),
                max_tokens: default_max_tokens(),
                temperature: default_temperature(),
                top_p: default_top_p(),
                repetition_penalty: default_repetition_penalty(),
            },
            memory: MemoryConfig {
                max_history: 12,
                context_limit: 6,
                session_timeout_secs: default_session_timeout(),
            },
            persona: PersonaConfig {
                name: "Taofik Akanbi".to_string(),
                role: "a Data Scientist".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                backtrace: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = AppConfig::default();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_context_limit_bounded_by_max_history() {
        let mut config = AppConfig::default();
        config.memory.context_limit = config.memory.max_history + 1;
        assert!(config.validate().is_err());
    }
}
