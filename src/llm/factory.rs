//! LLM client factory.
//!
//! Centralizes provider-specific logic for creating LLM clients.

use crate::config::LlmConfig;
use crate::error::{ChinookError, Result};
use crate::llm::gemini::DEFAULT_GEMINI_MODEL;
use crate::llm::ollama::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
use crate::llm::openai::DEFAULT_OPENAI_MODEL;
use crate::llm::{
    GeminiClient, GeminiConfig, LlmClient, LlmProvider, MockLlmClient, OllamaClient,
    OllamaConfig, OpenAiClient, OpenAiConfig,
};

/// Creates an LLM client for the given provider.
///
/// The API key is resolved in order:
/// 1. `settings.api_key`
/// 2. Environment variable (`GEMINI_API_KEY` then `GOOGLE_API_KEY`, or `OPENAI_API_KEY`)
///
/// A missing key for Gemini or OpenAI is an error; the caller treats it as fatal.
///
/// The model is `settings.model`, else the provider's environment variable
/// (`GEMINI_MODEL`, `OPENAI_MODEL`, `OLLAMA_MODEL`), else the provider default.
pub fn create_client(provider: LlmProvider, settings: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    create_client_with_env(provider, settings, env_non_empty)
}

/// Same as [`create_client`], reading environment variables through `env`.
///
/// `env` returns `None` for variables that are unset or blank.
pub fn create_client_with_env(
    provider: LlmProvider,
    settings: &LlmConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Box<dyn LlmClient>> {
    match provider {
        LlmProvider::Gemini => {
            let key = settings
                .api_key
                .clone()
                .or_else(|| env("GEMINI_API_KEY"))
                .or_else(|| env("GOOGLE_API_KEY"))
                .ok_or_else(|| {
                    ChinookError::config(
                        "No API key configured. Set GEMINI_API_KEY (or GOOGLE_API_KEY) or llm.api_key.",
                    )
                })?;
            let model = resolve_model(settings, env("GEMINI_MODEL"), DEFAULT_GEMINI_MODEL);
            let mut config = GeminiConfig::new(key, model).with_timeout(settings.timeout_secs);
            if let Some(url) = &settings.base_url {
                config = config.with_url(url.clone());
            }
            Ok(Box::new(GeminiClient::new(config)?))
        }
        LlmProvider::OpenAi => {
            let key = settings
                .api_key
                .clone()
                .or_else(|| env("OPENAI_API_KEY"))
                .ok_or_else(|| {
                    ChinookError::config("No API key configured. Set OPENAI_API_KEY or llm.api_key.")
                })?;
            let model = resolve_model(settings, env("OPENAI_MODEL"), DEFAULT_OPENAI_MODEL);
            let mut config = OpenAiConfig::new(key, model).with_timeout(settings.timeout_secs);
            if let Some(url) = &settings.base_url {
                config = config.with_url(url.clone());
            }
            Ok(Box::new(OpenAiClient::new(config)?))
        }
        LlmProvider::Ollama => {
            let model = resolve_model(settings, env("OLLAMA_MODEL"), DEFAULT_OLLAMA_MODEL);
            let url = settings
                .base_url
                .clone()
                .or_else(|| env("OLLAMA_URL"))
                .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
            let config = OllamaConfig::new(model)
                .with_url(url)
                .with_timeout(settings.timeout_secs.max(60));
            Ok(Box::new(OllamaClient::new(config)?))
        }
        LlmProvider::Mock => Ok(Box::new(MockLlmClient::new())),
    }
}

fn resolve_model(settings: &LlmConfig, from_env: Option<String>, default: &str) -> String {
    settings
        .model
        .clone()
        .or(from_env)
        .unwrap_or_else(|| default.to_string())
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_create_mock_client() {
        let client = create_client_with_env(LlmProvider::Mock, &LlmConfig::default(), no_env);
        assert!(client.is_ok());
    }

    #[test]
    fn test_create_gemini_without_key_fails() {
        let result = create_client_with_env(LlmProvider::Gemini, &LlmConfig::default(), no_env);
        let err = result.err().unwrap();
        assert!(err.to_string().contains("No API key configured"));
        assert_eq!(err.category(), "Configuration Error");
    }

    #[test]
    fn test_create_gemini_with_google_key_from_env() {
        let env = |name: &str| (name == "GOOGLE_API_KEY").then(|| "g-key".to_string());
        assert!(create_client_with_env(LlmProvider::Gemini, &LlmConfig::default(), env).is_ok());
    }

    #[test]
    fn test_create_openai_without_key_fails() {
        let env = |name: &str| (name == "GEMINI_API_KEY").then(|| "wrong-provider".to_string());
        let err = create_client_with_env(LlmProvider::OpenAi, &LlmConfig::default(), env)
            .err()
            .unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_create_gemini_with_configured_key() {
        let settings = LlmConfig {
            api_key: Some("test-key".to_string()),
            ..Default::default()
        };
        assert!(create_client_with_env(LlmProvider::Gemini, &settings, no_env).is_ok());
    }

    #[test]
    fn test_create_openai_with_configured_key() {
        let settings = LlmConfig {
            api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            ..Default::default()
        };
        assert!(create_client_with_env(LlmProvider::OpenAi, &settings, no_env).is_ok());
    }

    #[test]
    fn test_create_ollama_needs_no_key() {
        assert!(create_client_with_env(LlmProvider::Ollama, &LlmConfig::default(), no_env).is_ok());
    }

    #[test]
    fn test_resolve_model_precedence() {
        let settings = LlmConfig {
            model: Some("gemini-2.5-pro".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_model(&settings, Some("from-env".to_string()), DEFAULT_GEMINI_MODEL),
            "gemini-2.5-pro"
        );
        assert_eq!(
            resolve_model(
                &LlmConfig::default(),
                Some("from-env".to_string()),
                DEFAULT_GEMINI_MODEL
            ),
            "from-env"
        );
        assert_eq!(
            resolve_model(&LlmConfig::default(), None, DEFAULT_GEMINI_MODEL),
            DEFAULT_GEMINI_MODEL
        );
    }
}
