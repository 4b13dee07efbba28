//! SQLite data store.
//!
//! Every statement runs on its own connection: open, prepare, fetch, close.
//! Nothing is pooled or reused between questions. Text holding more than one
//! statement is rejected before a connection is opened.

use crate::db::{ColumnInfo, DataStore, QueryResult, Row, Value};
use crate::error::{ChinookError, Result};
use crate::guard::check_single_statement;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{Column, ConnectOptions, Connection, Executor, Row as _, Statement, TypeInfo, ValueRef};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a statement waits on a locked database file.
const BUSY_TIMEOUT_SECS: u64 = 5;

/// Data store backed by a SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Creates a store for the database file at `path`. The file is not opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Verifies that the database file exists.
    ///
    /// Connections never create the file, so a missing file would otherwise
    /// only surface on the first question.
    pub fn check(&self) -> Result<()> {
        if self.path.is_file() {
            Ok(())
        } else {
            Err(ChinookError::connection(format!(
                "Database file {} not found.",
                self.path.display()
            )))
        }
    }

    async fn open(&self) -> Result<SqliteConnection> {
        SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(false)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))
            .connect()
            .await
            .map_err(|e| map_connection_error(e, &self.path))
    }
}

#[async_trait]
impl DataStore for SqliteStore {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        // sqlx runs every statement in the string, so batches never get that far.
        check_single_statement(sql)?;

        let mut conn = self.open().await?;
        let result = run_statement(&mut conn, sql).await;

        if let Err(e) = conn.close().await {
            debug!("Failed to close database connection: {e}");
        }

        result
    }
}

/// Prepares `sql` to learn its columns, then fetches every row.
async fn run_statement(conn: &mut SqliteConnection, sql: &str) -> Result<QueryResult> {
    let start = Instant::now();

    // Preparing first keeps column names for statements that return no rows.
    let statement = (&mut *conn)
        .prepare(sql)
        .await
        .map_err(|e| ChinookError::query(format_query_error(e)))?;
    let columns: Vec<ColumnInfo> = statement
        .columns()
        .iter()
        .map(|col| ColumnInfo::new(col.name()))
        .collect();

    let rows = sqlx::query(sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| ChinookError::query(format_query_error(e)))?;

    let execution_time = start.elapsed();
    let rows: Vec<Row> = rows.iter().map(convert_row).collect();
    debug!(
        "Statement returned {} rows in {:?}",
        rows.len(),
        execution_time
    );

    Ok(QueryResult::with_data(columns, rows).with_execution_time(execution_time))
}

/// Converts a sqlx SqliteRow to our Row type.
fn convert_row(row: &SqliteRow) -> Row {
    (0..row.len()).map(|i| convert_value(row, i)).collect()
}

/// Converts one cell using the storage class of the stored value, not the declared type.
fn convert_value(row: &SqliteRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_uppercase(),
        Err(_) => return Value::Null,
    };

    match type_name.as_str() {
        "INTEGER" | "BOOLEAN" => row
            .try_get_unchecked::<i64, _>(index)
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "REAL" | "NUMERIC" => row
            .try_get_unchecked::<f64, _>(index)
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BLOB" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        _ => row
            .try_get_unchecked::<String, _>(index)
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Maps sqlx open errors to user-friendly messages.
fn map_connection_error(error: sqlx::Error, path: &Path) -> ChinookError {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("unable to open database file") {
        ChinookError::connection(format!(
            "Cannot open database file {}. Check that it exists and is readable.",
            path.display()
        ))
    } else if error_str.contains("file is not a database") {
        ChinookError::connection(format!("{} is not a SQLite database.", path.display()))
    } else {
        ChinookError::connection(error.to_string())
    }
}

/// Formats a statement error, keeping SQLite's own message when there is one.
fn format_query_error(error: sqlx::Error) -> String {
    match error.as_database_error() {
        Some(db_error) => db_error.message().to_string(),
        None => error.to_string(),
    }
}
