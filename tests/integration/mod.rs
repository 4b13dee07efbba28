//! Integration tests for chinook-query.
//!
//! Shared fixture: a subset of the Chinook schema with a handful of rows.

pub mod ask_test;
pub mod store_test;

use chinook_query::db::SqliteStore;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use tempfile::TempDir;

const CHINOOK_SUBSET: &str = r#"
CREATE TABLE Artist (ArtistId INTEGER PRIMARY KEY, Name NVARCHAR(120));
CREATE TABLE Album (AlbumId INTEGER PRIMARY KEY, Title NVARCHAR(160) NOT NULL, ArtistId INTEGER NOT NULL);
CREATE TABLE Genre (GenreId INTEGER PRIMARY KEY, Name NVARCHAR(120));
CREATE TABLE Track (
    TrackId INTEGER PRIMARY KEY,
    Name NVARCHAR(200) NOT NULL,
    AlbumId INTEGER,
    GenreId INTEGER,
    Composer NVARCHAR(220),
    Milliseconds INTEGER NOT NULL,
    UnitPrice NUMERIC(10,2) NOT NULL
);
CREATE TABLE Customer (
    CustomerId INTEGER PRIMARY KEY,
    FirstName NVARCHAR(40) NOT NULL,
    LastName NVARCHAR(20) NOT NULL,
    City NVARCHAR(40),
    Country NVARCHAR(40)
);

INSERT INTO Artist VALUES (1, 'AC/DC'), (2, 'Accept'), (3, 'Aerosmith');
INSERT INTO Album VALUES
    (1, 'For Those About To Rock We Salute You', 1),
    (2, 'Balls to the Wall', 2),
    (3, 'Restless and Wild', 2),
    (4, 'Let There Be Rock', 1);
INSERT INTO Genre VALUES (1, 'Rock'), (2, 'Jazz'), (3, 'Metal');
INSERT INTO Track VALUES
    (1, 'For Those About To Rock (We Salute You)', 1, 1, 'Angus Young, Malcolm Young, Brian Johnson', 343719, 0.99),
    (2, 'Balls to the Wall', 2, 1, NULL, 342562, 0.99),
    (3, 'Fast As a Shark', 3, 1, 'F. Baltes, S. Kaufman, U. Dirkscneider & W. Hoffman', 230619, 0.99),
    (4, 'Go Down', 4, 1, 'AC/DC', 331180, 0.99),
    (5, 'Desafinado', NULL, 2, NULL, 185338, 0.99),
    (6, 'Overkill', NULL, 3, NULL, 206471, 0.99);
INSERT INTO Customer VALUES
    (1, 'Luís', 'Gonçalves', 'São José dos Campos', 'Brazil'),
    (2, 'Leonie', 'Köhler', 'Stuttgart', 'Germany'),
    (10, 'Eduardo', 'Martins', 'São Paulo', 'Brazil');
"#;

/// Creates a temporary Chinook subset and returns a store pointing at it.
///
/// The `TempDir` must be kept alive for as long as the store is used.
pub async fn chinook_fixture() -> (SqliteStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Chinook_Sqlite.sqlite");

    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .connect()
        .await
        .unwrap();
    sqlx::raw_sql(CHINOOK_SUBSET).execute(&mut conn).await.unwrap();
    conn.close().await.unwrap();

    (SqliteStore::new(path), dir)
}
