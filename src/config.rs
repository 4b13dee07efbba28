//! Configuration management for chinook-query.
//!
//! Handles loading configuration from a TOML file. Command-line flags and
//! environment variables are layered on top by the binary.

use crate::error::{ChinookError, Result};
use crate::instruction::{Instruction, InstructionPreset};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Database file used when nothing else is configured.
pub const DEFAULT_DATABASE_PATH: &str = "Chinook_Sqlite.sqlite";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Generation service settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Instruction selection.
    #[serde(default)]
    pub instruction: InstructionConfig,
}

/// Generation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "gemini", "openai", "ollama" or "mock".
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model name. Falls back to the provider's environment variable, then its default.
    pub model: Option<String>,

    /// API key (not recommended to store in config; prefer environment variables).
    pub api_key: Option<String>,

    /// Base URL override for self-hosted or proxied endpoints.
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub path: PathBuf,

    /// Reject generated statements that are not queries.
    #[serde(default)]
    pub read_only: bool,
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            read_only: false,
        }
    }
}

/// Instruction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionConfig {
    /// Named preset: "explorer" or "concise".
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Custom instruction file; takes precedence over the preset.
    pub file: Option<PathBuf>,
}

fn default_preset() -> String {
    InstructionPreset::default().as_str().to_string()
}

impl Default for InstructionConfig {
    fn default() -> Self {
        Self {
            preset: default_preset(),
            file: None,
        }
    }
}

impl InstructionConfig {
    /// Resolves the configured instruction.
    pub fn resolve(&self) -> Result<Instruction> {
        if let Some(path) = &self.file {
            return Instruction::from_file(path);
        }
        let preset: InstructionPreset = self.preset.parse()?;
        Ok(Instruction::preset(preset))
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chinook-query")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ChinookError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ChinookError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }
}
