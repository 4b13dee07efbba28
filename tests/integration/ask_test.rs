//! End-to-end question tests.
//!
//! Runs questions through the mock LLM client against a real SQLite file.

use super::chinook_fixture;
use chinook_query::app::{Answer, App};
use chinook_query::db::{DataStore, Value};
use chinook_query::guard::MULTIPLE_STATEMENTS;
use chinook_query::instruction::{Instruction, InstructionPreset, ABOUT_REPLY};
use chinook_query::llm::MockLlmClient;
use chinook_query::render::{render_answer, OutputFormat};

async fn app_with(client: MockLlmClient) -> (App, tempfile::TempDir) {
    let (store, dir) = chinook_fixture().await;
    let app = App::new(Box::new(client), Box::new(store), Instruction::default());
    (app, dir)
}

#[tokio::test]
async fn test_albums_by_artist() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    let Answer::Rows { result, .. } = app.ask("List all albums by AC/DC").await else {
        panic!("expected rows");
    };

    assert_eq!(result.column_names(), vec!["Title"]);
    let titles: Vec<String> = result.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(result.row_count, 2);
    assert!(titles.contains(&"Let There Be Rock".to_string()));
    assert!(titles.contains(&"For Those About To Rock We Salute You".to_string()));
}

#[tokio::test]
async fn test_customers_by_country() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    let Answer::Rows { result, .. } = app.ask("Which customers are from Brazil?").await else {
        panic!("expected rows");
    };

    assert_eq!(result.column_names(), vec!["FirstName", "LastName", "City"]);
    assert_eq!(result.row_count, 2);
    assert_eq!(result.rows[0][2], Value::from("São José dos Campos"));
}

#[tokio::test]
async fn test_top_genres() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    let Answer::Rows { result, .. } = app.ask("Show the top 5 genres by number of tracks").await
    else {
        panic!("expected rows");
    };

    assert_eq!(result.column_names(), vec!["Name", "TrackCount"]);
    assert_eq!(result.row_count, 3);
    assert_eq!(result.rows[0], vec![Value::from("Rock"), Value::Int(4)]);
}

#[tokio::test]
async fn test_aggregate_count() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    let Answer::Rows { result, .. } = app.ask("Count the artists").await else {
        panic!("expected rows");
    };

    assert_eq!(result.rows, vec![vec![Value::Int(3)]]);
}

#[tokio::test]
async fn test_meta_question_is_prose() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    match app.ask("What are you?").await {
        Answer::Text(text) => assert_eq!(text, ABOUT_REPLY),
        other => panic!("expected text, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_table_is_reported_not_fatal() {
    let client = MockLlmClient::new().with_response("playlists", "SELECT * FROM Playlist");
    let (app, _dir) = app_with(client).await;

    let answer = app.ask("Show playlists").await;
    let text = render_answer(&answer, OutputFormat::Text);

    assert!(answer.is_failure());
    assert!(text.contains("Error executing SQL:"));
    assert!(text.contains("no such table: Playlist"));

    // The handle keeps working after a failure.
    assert!(matches!(app.ask("Count the artists").await, Answer::Rows { .. }));
}

#[tokio::test]
async fn test_malformed_sql_is_reported() {
    let client = MockLlmClient::new().with_response("broken", "SELECT FROM WHERE Artist");
    let (app, _dir) = app_with(client).await;

    assert!(matches!(
        app.ask("broken please").await,
        Answer::QueryFailed { .. }
    ));
}

#[tokio::test]
async fn test_mutation_executes_by_default() {
    let client = MockLlmClient::new()
        .with_response("add", "INSERT INTO Genre (GenreId, Name) VALUES (4, 'Polka')");
    let (store, _dir) = chinook_fixture().await;
    let check = store.clone();
    let app = App::new(Box::new(client), Box::new(store), Instruction::default());

    let Answer::Rows { result, .. } = app.ask("add a polka genre").await else {
        panic!("expected rows");
    };
    assert!(result.columns.is_empty());

    let genres = check.execute_query("SELECT COUNT(*) FROM Genre").await.unwrap();
    assert_eq!(genres.rows[0][0], Value::Int(4));
}

#[tokio::test]
async fn test_read_only_blocks_mutation() {
    let client = MockLlmClient::new().with_response("remove", "DELETE FROM Customer");
    let (store, _dir) = chinook_fixture().await;
    let check = store.clone();
    let app = App::new(
        Box::new(client),
        Box::new(store),
        Instruction::preset(InstructionPreset::Concise),
    )
    .with_read_only(true);

    let answer = app.ask("remove all customers").await;
    assert!(matches!(answer, Answer::QueryFailed { .. }));

    let customers = check
        .execute_query("SELECT COUNT(*) FROM Customer")
        .await
        .unwrap();
    assert_eq!(customers.rows[0][0], Value::Int(3));
}

#[tokio::test]
async fn test_json_output_for_rows() {
    let (app, _dir) = app_with(MockLlmClient::new()).await;

    let answer = app.ask("Count the artists").await;
    let json: serde_json::Value =
        serde_json::from_str(&render_answer(&answer, OutputFormat::Json)).unwrap();

    assert_eq!(json["kind"], "rows");
    assert_eq!(json["columns"], serde_json::json!(["ArtistCount"]));
    assert_eq!(json["rows"], serde_json::json!([[3]]));
    assert_eq!(json["row_count"], 1);
}

#[tokio::test]
async fn test_generation_failure_is_reported() {
    let (app, _dir) = app_with(MockLlmClient::failing("API quota exceeded")).await;

    let answer = app.ask("List all albums by AC/DC").await;
    let text = render_answer(&answer, OutputFormat::Text);

    assert!(matches!(answer, Answer::GenerationFailed(_)));
    assert!(text.starts_with("LLM Error:"));
}

#[tokio::test]
async fn test_multi_statement_reply_is_refused() {
    let client = MockLlmClient::new().with_response(
        "artist names",
        "SELECT Name FROM Artist; DELETE FROM Artist",
    );
    let (store, _dir) = chinook_fixture().await;
    let check = store.clone();
    let app = App::new(Box::new(client), Box::new(store), Instruction::default());

    match app.ask("artist names please").await {
        Answer::QueryFailed { sql, error } => {
            assert_eq!(sql, "SELECT Name FROM Artist; DELETE FROM Artist");
            assert!(error.to_string().contains(MULTIPLE_STATEMENTS));
        }
        other => panic!("expected query failure, got {other:?}"),
    }

    let artists = check.execute_query("SELECT COUNT(*) FROM Artist").await.unwrap();
    assert_eq!(artists.rows[0][0], Value::Int(3));
}
