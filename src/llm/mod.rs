//! Generation service clients.
//!
//! Provides the client trait and one implementation per supported provider.

pub mod factory;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod prompt;
pub mod types;

pub use factory::create_client;
pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockLlmClient;
pub use ollama::{OllamaClient, OllamaConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::build_messages;
pub use types::{Message, Role};

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::{ChinookError, Result};

/// Trait for clients that turn an instruction and a question into text.
///
/// Implementations make exactly one request per call; there is no retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given messages.
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// LLM provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini
    #[default]
    Gemini,
    /// OpenAI (GPT-4o, etc.)
    OpenAi,
    /// Local Ollama instance
    Ollama,
    /// Canned Chinook answers (no API key required)
    Mock,
}

impl LlmProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ChinookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(ChinookError::config(format!(
                "Unknown LLM provider: {s}. Expected: gemini, openai, ollama, or mock"
            ))),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a transport-level request failure to a readable error.
pub(crate) fn map_request_error(provider: &str, error: reqwest::Error) -> ChinookError {
    if error.is_timeout() {
        ChinookError::llm("Request timed out. Try again.")
    } else if error.is_connect() {
        ChinookError::llm(format!(
            "Failed to connect to the {provider} API. Check your network."
        ))
    } else {
        ChinookError::llm(format!("Request failed: {error}"))
    }
}
