//! Core orchestrator for chinook-query.
//!
//! Coordinates the generation client, the response classifier and the data
//! store to answer one question at a time.

use crate::classifier::{classify, Classification};
use crate::db::{DataStore, QueryResult};
use crate::error::ChinookError;
use crate::guard::check_read_only;
use crate::instruction::Instruction;
use crate::llm::{build_messages, LlmClient};
use tracing::{debug, warn};

/// Outcome of submitting one question.
#[derive(Debug)]
pub enum Answer {
    /// The model replied with SQL and it executed.
    Rows { sql: String, result: QueryResult },

    /// The model replied with SQL but it was rejected or failed to execute.
    QueryFailed { sql: String, error: ChinookError },

    /// The model replied with prose, shown verbatim.
    Text(String),

    /// The generation service could not produce a reply.
    GenerationFailed(ChinookError),
}

impl Answer {
    /// Returns the generated SQL, if the reply was classified as SQL.
    pub fn sql(&self) -> Option<&str> {
        match self {
            Answer::Rows { sql, .. } | Answer::QueryFailed { sql, .. } => Some(sql),
            Answer::Text(_) | Answer::GenerationFailed(_) => None,
        }
    }

    /// Returns true for the two failure variants.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Answer::QueryFailed { .. } | Answer::GenerationFailed(_)
        )
    }
}

/// Application handle built once at startup.
///
/// Holds the generation client, the data store and the instruction. Nothing
/// in it changes after construction, and no state carries over between
/// questions.
pub struct App {
    client: Box<dyn LlmClient>,
    store: Box<dyn DataStore>,
    instruction: Instruction,
    read_only: bool,
}

impl App {
    /// Creates an application handle with the read-only guard disabled.
    pub fn new(
        client: Box<dyn LlmClient>,
        store: Box<dyn DataStore>,
        instruction: Instruction,
    ) -> Self {
        Self {
            client,
            store,
            instruction,
            read_only: false,
        }
    }

    /// Enables or disables rejection of non-query statements before execution.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Returns whether the read-only guard is enabled.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Runs one full round trip: generate, classify, then execute or pass through.
    ///
    /// Failures are reported inside the returned [`Answer`]; this never errors.
    pub async fn ask(&self, question: &str) -> Answer {
        let messages = build_messages(&self.instruction, question);
        debug!("Sending question to generation service: {question}");

        let reply = match self.client.complete(&messages).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Generation failed: {e}");
                return Answer::GenerationFailed(e);
            }
        };

        let classification = classify(Some(&reply));
        debug!("Reply classified as {classification}");

        match classification {
            Classification::NaturalLanguage => Answer::Text(reply),
            Classification::SqlQuery => self.execute(reply).await,
        }
    }

    async fn execute(&self, sql: String) -> Answer {
        if self.read_only {
            if let Err(error) = check_read_only(&sql) {
                warn!("Rejected generated statement: {error}");
                return Answer::QueryFailed { sql, error };
            }
        }

        match self.store.execute_query(&sql).await {
            Ok(result) => Answer::Rows { sql, result },
            Err(error) => {
                warn!("Generated statement failed: {error}");
                Answer::QueryFailed { sql, error }
            }
        }
    }
}
