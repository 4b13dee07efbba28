//! Error types for chinook-query.

use thiserror::Error;

/// Main error type for chinook-query operations.
#[derive(Error, Debug)]
pub enum ChinookError {
    /// The database file could not be opened.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution errors (syntax errors, missing tables, rejected statements).
    #[error("Query error: {0}")]
    Query(String),

    /// Generation service errors (auth, quota, network, malformed replies).
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration errors (invalid config file, missing credential, unknown preset).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal application errors (terminal I/O, unexpected states).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChinookError {
    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error with the given message.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an LLM error with the given message.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "Connection Error",
            Self::Query(_) => "Query Error",
            Self::Llm(_) => "LLM Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

impl From<std::io::Error> for ChinookError {
    fn from(e: std::io::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Result type alias using ChinookError.
pub type Result<T> = std::result::Result<T, ChinookError>;
