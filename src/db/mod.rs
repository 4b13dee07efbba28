//! Data store abstraction.
//!
//! Provides a trait-based interface for executing generated SQL, so the
//! orchestration can run against SQLite or a test double interchangeably.

mod mock;
mod sqlite;
mod types;

pub use mock::{FailingDataStore, MockDataStore};
pub use sqlite::SqliteStore;
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Trait defining the interface for data stores.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Executes one SQL statement and returns its rows and column names.
    ///
    /// Statements that return no rows (including mutations) yield an empty result.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;
}

#[async_trait]
impl<T: DataStore + ?Sized> DataStore for Arc<T> {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        (**self).execute_query(sql).await
    }
}
