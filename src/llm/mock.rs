//! Mock LLM client for testing and offline demos.
//!
//! Returns deterministic Chinook answers based on keywords in the question.

use async_trait::async_trait;

use crate::error::{ChinookError, Result};
use crate::instruction::ABOUT_REPLY;
use crate::llm::types::{Message, Role};
use crate::llm::LlmClient;

/// Mock LLM client that returns canned responses based on input patterns.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    /// Custom response mappings (pattern -> response), checked first.
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this message.
    failure: Option<String>,
}

impl MockLlmClient {
    /// Creates a new mock client with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the question contains `pattern` (case-insensitive), the mock returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail with an LLM error, as an unreachable service would.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            custom_responses: Vec::new(),
            failure: Some(message.into()),
        }
    }

    fn mock_response(&self, input: &str) -> String {
        let input_lower = input.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if input_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if input_lower.contains("who made you")
            || input_lower.contains("about yourself")
            || input_lower.contains("what are you")
        {
            return ABOUT_REPLY.to_string();
        }

        if input_lower.contains("ac/dc") {
            return "SELECT Album.Title FROM Album JOIN Artist ON Album.ArtistId = Artist.ArtistId WHERE Artist.Name = 'AC/DC'".to_string();
        }

        if input_lower.contains("brazil") {
            return "SELECT FirstName, LastName, City FROM Customer WHERE Country = 'Brazil'"
                .to_string();
        }

        if input_lower.contains("genre") && input_lower.contains("top") {
            return "SELECT Genre.Name, COUNT(*) AS TrackCount FROM Track JOIN Genre ON Track.GenreId = Genre.GenreId GROUP BY Genre.Name ORDER BY TrackCount DESC LIMIT 5".to_string();
        }

        if input_lower.contains("count") && input_lower.contains("artist") {
            return "SELECT COUNT(*) AS ArtistCount FROM Artist".to_string();
        }

        if input_lower.contains("album") {
            return "SELECT Title FROM Album".to_string();
        }

        if input_lower.contains("artist") {
            return "SELECT Name FROM Artist".to_string();
        }

        if input_lower.contains("table") || input_lower.contains("schema") {
            return "The Chinook database has eleven tables: Artist, Album, Track, Genre, MediaType, Playlist, PlaylistTrack, Customer, Employee, Invoice and InvoiceLine.".to_string();
        }

        "I don't understand that question. Could you please rephrase it?".to_string()
    }

    /// Extracts the last user message content from a message list.
    fn extract_user_input(messages: &[Message]) -> String {
        messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(ChinookError::llm(message.clone()));
        }
        let input = Self::extract_user_input(messages);
        Ok(self.mock_response(&input))
    }
}
