//! SQLite store integration tests.

use super::chinook_fixture;
use chinook_query::db::{DataStore, SqliteStore, Value};
use chinook_query::error::ChinookError;
use chinook_query::guard::MULTIPLE_STATEMENTS;

#[tokio::test]
async fn test_join_across_tables() {
    let (store, _dir) = chinook_fixture().await;

    let result = store
        .execute_query(
            "SELECT Artist.Name, COUNT(Album.AlbumId) AS Albums FROM Artist \
             LEFT JOIN Album ON Album.ArtistId = Artist.ArtistId \
             GROUP BY Artist.ArtistId ORDER BY Artist.ArtistId",
        )
        .await
        .unwrap();

    assert_eq!(result.column_names(), vec!["Name", "Albums"]);
    assert_eq!(
        result.rows,
        vec![
            vec![Value::from("AC/DC"), Value::Int(2)],
            vec![Value::from("Accept"), Value::Int(2)],
            vec![Value::from("Aerosmith"), Value::Int(0)],
        ]
    );
}

#[tokio::test]
async fn test_with_clause_query() {
    let (store, _dir) = chinook_fixture().await;

    let result = store
        .execute_query(
            "WITH long_tracks AS (SELECT * FROM Track WHERE Milliseconds > 300000) \
             SELECT COUNT(*) AS n FROM long_tracks",
        )
        .await
        .unwrap();

    assert_eq!(result.rows[0][0], Value::Int(3));
}

#[tokio::test]
async fn test_nulls_and_reals() {
    let (store, _dir) = chinook_fixture().await;

    let result = store
        .execute_query("SELECT Composer, UnitPrice FROM Track WHERE TrackId = 5")
        .await
        .unwrap();

    assert!(result.rows[0][0].is_null());
    assert_eq!(result.rows[0][1], Value::Float(0.99));
}

#[tokio::test]
async fn test_each_statement_uses_fresh_connection() {
    let (store, _dir) = chinook_fixture().await;

    store
        .execute_query("CREATE TEMP TABLE scratch (x INTEGER)")
        .await
        .unwrap();

    // Temp tables die with their connection.
    let err = store
        .execute_query("SELECT * FROM scratch")
        .await
        .unwrap_err();
    assert!(matches!(err, ChinookError::Query(_)));
}

#[tokio::test]
async fn test_missing_database_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path().join("Chinook_Sqlite.sqlite"));

    let err = store.check().unwrap_err();
    assert_eq!(err.category(), "Connection Error");
}

#[tokio::test]
async fn test_hidden_delete_in_batch_never_runs() {
    let (store, _dir) = chinook_fixture().await;

    let err = store
        .execute_query("SELECT Name FROM Artist; DELETE FROM Artist")
        .await
        .unwrap_err();
    assert!(matches!(err, ChinookError::Query(_)));
    assert!(err.to_string().contains(MULTIPLE_STATEMENTS));

    let count = store
        .execute_query("SELECT COUNT(*) FROM Artist")
        .await
        .unwrap();
    assert_eq!(count.rows[0][0], Value::Int(3));
}

#[tokio::test]
async fn test_batch_of_queries_rejected() {
    let (store, _dir) = chinook_fixture().await;

    let err = store
        .execute_query("SELECT 1 AS a; SELECT 2 AS a, 3 AS b")
        .await
        .unwrap_err();
    assert!(err.to_string().contains(MULTIPLE_STATEMENTS));
}

#[tokio::test]
async fn test_trailing_semicolon_allowed() {
    let (store, _dir) = chinook_fixture().await;

    let result = store
        .execute_query("SELECT Name FROM Genre WHERE GenreId = 2;\n")
        .await
        .unwrap();
    assert_eq!(result.rows, vec![vec![Value::from("Jazz")]]);
}
