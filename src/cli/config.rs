//! Configuration management for docanchor
//!
//! TOML-based configuration with defaults and validation.
//! Location: ~/.docanchor/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::{DocAnchorError, Result};
use crate::retrieval::FusionWeights;

/// Complete configuration for docanchor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub retrieval: RetrievalConfig,
    pub ollama: OllamaConfig,
    pub paths: PathsConfig,
}

/// Retrieval and fusion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub lexical_weight: f64,
    pub semantic_weight: f64,
    pub top_k: usize,
}

/// Ollama connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub generation_model: String,
    pub embedding_model: String,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub eval_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retrieval: RetrievalConfig::default(),
            ollama: OllamaConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        let weights = FusionWeights::default();
        Self {
            lexical_weight: weights.lexical,
            semantic_weight: weights.semantic,
            top_k: 5,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            generation_model: "qwen2.5:7b-instruct".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            eval_log: "~/.docanchor/eval/records.jsonl".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(&config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DocAnchorError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| DocAnchorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location or fall back to built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let config_path = home.join(".docanchor").join("config.toml");
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Weight misconfiguration is never silently defaulted
        self.weights()?;

        if self.retrieval.top_k == 0 {
            return Err(DocAnchorError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &PathBuf) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DocAnchorError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DocAnchorError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DocAnchorError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Fusion weights as the validated retrieval type
    pub fn weights(&self) -> Result<FusionWeights> {
        FusionWeights::new(self.retrieval.lexical_weight, self.retrieval.semantic_weight)
    }

    /// Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Evaluation log path with tilde expanded
    pub fn eval_log_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.eval_log)
    }
}
