//! Test doubles for the data store.

use super::{ColumnInfo, DataStore, QueryResult, Value};
use crate::error::{ChinookError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// A data store that returns a fixed result and records the statements it receives.
#[derive(Debug, Default)]
pub struct MockDataStore {
    result: QueryResult,
    executed: Mutex<Vec<String>>,
}

impl MockDataStore {
    /// Creates a mock store that echoes each statement back as a one-cell result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock store that always returns `result`.
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            result,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Returns the statements executed so far, oldest first.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DataStore for MockDataStore {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        if !self.result.columns.is_empty() {
            return Ok(self.result.clone());
        }

        Ok(QueryResult::with_data(
            vec![ColumnInfo::new("result")],
            vec![vec![Value::String(format!("Mock result for: {sql}"))]],
        ))
    }
}

/// A data store whose every statement fails, as a broken database would.
#[derive(Debug, Clone)]
pub struct FailingDataStore {
    message: String,
}

impl FailingDataStore {
    /// Creates a store that fails with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl DataStore for FailingDataStore {
    async fn execute_query(&self, _sql: &str) -> Result<QueryResult> {
        Err(ChinookError::query(self.message.clone()))
    }
}
