//! Checks on generated SQL before it reaches the database.
//!
//! [`check_single_statement`] tokenizes with sqlparser's SQLite dialect and
//! rejects replies that hold more than one statement. It always runs.
//!
//! [`check_read_only`] is the opt-in guard: it parses the statement and
//! accepts it only if it is a plain query. Mutations hidden in CTEs or
//! derived tables are rejected too. Anything that fails to parse is rejected.

use sqlparser::ast::{Query, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};

use crate::error::{ChinookError, Result};

/// Error message for replies holding several statements.
pub const MULTIPLE_STATEMENTS: &str = "only one statement can be executed at a time";

/// Checks that `sql` holds at most one statement.
///
/// Semicolons inside strings, identifiers and comments do not count, and a
/// trailing semicolon is fine. Text the tokenizer cannot read is rejected.
pub fn check_single_statement(sql: &str) -> Result<()> {
    let tokens = Tokenizer::new(&SQLiteDialect {}, sql)
        .tokenize()
        .map_err(|e| ChinookError::query(format!("Could not read SQL: {e}")))?;

    let mut statements = 0;
    let mut in_statement = false;
    for token in &tokens {
        match token {
            Token::Whitespace(_) | Token::EOF => {}
            Token::SemiColon => in_statement = false,
            _ if !in_statement => {
                in_statement = true;
                statements += 1;
            }
            _ => {}
        }
    }

    if statements > 1 {
        return Err(ChinookError::query(MULTIPLE_STATEMENTS));
    }
    Ok(())
}

/// Checks that `sql` only reads data.
///
/// Returns a query error naming the offending statement kind otherwise.
pub fn check_read_only(sql: &str) -> Result<()> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, sql)
        .map_err(|e| ChinookError::query(format!("Read-only mode: could not parse SQL: {e}")))?;

    if statements.is_empty() {
        return Err(ChinookError::query("Read-only mode: empty SQL statement"));
    }

    for statement in &statements {
        if !statement_is_read_only(statement) {
            return Err(ChinookError::query(format!(
                "Read-only mode: refusing to run {}",
                statement_kind(statement)
            )));
        }
    }

    Ok(())
}

fn statement_is_read_only(statement: &Statement) -> bool {
    match statement {
        Statement::Query(query) => query_is_read_only(query),
        Statement::Explain {
            analyze, statement, ..
        } => !*analyze || statement_is_read_only(statement),
        _ => false,
    }
}

fn query_is_read_only(query: &Query) -> bool {
    let ctes_ok = query
        .with
        .as_ref()
        .map_or(true, |with| with.cte_tables.iter().all(|cte| query_is_read_only(&cte.query)));

    ctes_ok && set_expr_is_read_only(&query.body)
}

fn set_expr_is_read_only(set_expr: &SetExpr) -> bool {
    match set_expr {
        SetExpr::Select(select) => select.from.iter().all(table_with_joins_is_read_only),
        SetExpr::Query(query) => query_is_read_only(query),
        SetExpr::SetOperation { left, right, .. } => {
            set_expr_is_read_only(left) && set_expr_is_read_only(right)
        }
        SetExpr::Values(_) | SetExpr::Table(_) => true,
        // INSERT/UPDATE and friends wrapped as query bodies
        _ => false,
    }
}

fn table_with_joins_is_read_only(twj: &TableWithJoins) -> bool {
    table_factor_is_read_only(&twj.relation)
        && twj
            .joins
            .iter()
            .all(|join| table_factor_is_read_only(&join.relation))
}

fn table_factor_is_read_only(factor: &TableFactor) -> bool {
    match factor {
        TableFactor::Derived { subquery, .. } => query_is_read_only(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => table_with_joins_is_read_only(table_with_joins),
        _ => true,
    }
}

/// Short human label for a statement, used in rejection messages.
fn statement_kind(statement: &Statement) -> &'static str {
    match statement {
        Statement::Query(_) => "a data-modifying query",
        Statement::Explain { .. } => "EXPLAIN ANALYZE of a mutation",
        Statement::Insert(_) => "INSERT",
        Statement::Update { .. } => "UPDATE",
        Statement::Delete(_) => "DELETE",
        Statement::Drop { .. } => "DROP",
        Statement::AlterTable { .. } => "ALTER",
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. } => "CREATE",
        _ => "a non-query statement",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_allowed(sql: &str) {
        assert!(check_read_only(sql).is_ok(), "expected allowed: {sql}");
    }

    fn assert_rejected(sql: &str) {
        let err = check_read_only(sql).unwrap_err();
        assert!(
            matches!(err, ChinookError::Query(_)),
            "expected query error for {sql}, got {err:?}"
        );
    }

    #[test]
    fn test_single_statement_allowed() {
        assert!(check_single_statement("SELECT Name FROM Artist").is_ok());
        assert!(check_single_statement("SELECT Name FROM Artist;").is_ok());
        assert!(check_single_statement("SELECT Name FROM Artist;  -- done\n").is_ok());
        assert!(check_single_statement("").is_ok());
    }

    #[test]
    fn test_semicolons_in_literals_and_comments_ignored() {
        assert!(check_single_statement("SELECT 'a;b' AS s").is_ok());
        assert!(check_single_statement("SELECT \"x;y\" FROM t").is_ok());
        assert!(check_single_statement("SELECT 1 /* ; DELETE FROM Artist */").is_ok());
    }

    #[test]
    fn test_multiple_statements_rejected() {
        let err = check_single_statement("SELECT Name FROM Artist; DELETE FROM Artist").unwrap_err();
        assert!(matches!(err, ChinookError::Query(_)));
        assert!(err.to_string().contains(MULTIPLE_STATEMENTS));

        assert!(check_single_statement("SELECT 1 AS a; SELECT 2 AS a, 3 AS b").is_err());
        assert!(check_single_statement("SELECT 1;;\n;SELECT 2").is_err());
    }

    #[test]
    fn test_select_allowed() {
        assert_allowed("SELECT Name FROM Artist");
    }

    #[test]
    fn test_join_and_aggregate_allowed() {
        assert_allowed(
            "SELECT g.Name, COUNT(t.TrackId) AS TrackCount FROM Genre g \
             JOIN Track t ON g.GenreId = t.GenreId GROUP BY g.Name \
             ORDER BY TrackCount DESC LIMIT 5",
        );
    }

    #[test]
    fn test_cte_select_allowed() {
        assert_allowed(
            "WITH big AS (SELECT AlbumId FROM Track GROUP BY AlbumId HAVING COUNT(*) > 20) \
             SELECT Title FROM Album WHERE AlbumId IN (SELECT AlbumId FROM big)",
        );
    }

    #[test]
    fn test_union_allowed() {
        assert_allowed("SELECT Name FROM Artist UNION SELECT Name FROM Genre");
    }

    #[test]
    fn test_derived_table_allowed() {
        assert_allowed("SELECT * FROM (SELECT Name FROM Artist) AS a");
    }

    #[test]
    fn test_insert_rejected() {
        assert_rejected("INSERT INTO Genre (Name) VALUES ('Polka')");
        let err = check_read_only("INSERT INTO Genre (Name) VALUES ('Polka')").unwrap_err();
        assert!(err.to_string().contains("INSERT"));
    }

    #[test]
    fn test_update_rejected() {
        assert_rejected("UPDATE Track SET UnitPrice = 0 WHERE TrackId = 1");
    }

    #[test]
    fn test_delete_rejected() {
        assert_rejected("DELETE FROM Invoice");
    }

    #[test]
    fn test_drop_rejected() {
        assert_rejected("DROP TABLE Customer");
    }

    #[test]
    fn test_create_rejected() {
        assert_rejected("CREATE TABLE Scratch (id INTEGER)");
    }

    #[test]
    fn test_mixed_batch_rejected() {
        assert_rejected("SELECT 1; DELETE FROM Artist");
    }

    #[test]
    fn test_unparseable_rejected() {
        assert_rejected("SELEC Name FROM Artist");
    }

    #[test]
    fn test_empty_rejected() {
        assert_rejected("");
        assert_rejected("   ");
    }
}
