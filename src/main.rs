//! chinook-query - Ask the Chinook music database questions in plain English.

use chinook_query::app::App;
use chinook_query::cli::Cli;
use chinook_query::config::Config;
use chinook_query::db::SqliteStore;
use chinook_query::error::{ChinookError, Result};
use chinook_query::llm::{create_client, LlmProvider};
use chinook_query::logging::{init_file_logging, init_stderr_logging};
use chinook_query::render::{render_answer, OutputFormat};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

/// Printed once when the interactive prompt starts in text mode.
const BANNER: &str = "\
Chinook Query
Ask about the Chinook music store (artists, albums, tracks, customers, invoices) in plain English.

Try asking:
  - List all albums by AC/DC
  - Which customers are from Brazil?
  - Show the top 5 genres by number of tracks

Type 'exit' or 'quit' to leave.
";

const PROMPT: &str = "Enter your question: ";

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let logs_to_file = cli.log_file.is_some();

    match &cli.log_file {
        Some(path) => {
            if let Err(e) = init_file_logging(path, cli.log_level()) {
                eprintln!("{}: {}", e.category(), e);
                std::process::exit(1);
            }
        }
        None => init_stderr_logging(cli.log_level()),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        if logs_to_file {
            eprintln!("{}: {}", e.category(), e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = cli.parse_output_format().map_err(ChinookError::config)?;

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let provider: LlmProvider = config.llm.provider.parse()?;
    let instruction = config.instruction.resolve()?;
    let client = create_client(provider, &config.llm)?;
    info!("Using LLM provider: {provider}");

    let store = SqliteStore::new(config.database.path.clone());
    store.check()?;
    info!("Using database: {}", store.path().display());

    let app = App::new(client, Box::new(store), instruction)
        .with_read_only(config.database.read_only);
    if app.is_read_only() {
        info!("Read-only mode: only queries will run");
    }

    match &cli.question {
        Some(question) => ask_and_print(&app, question, format).await,
        None => run_interactive(&app, format).await,
    }
}

/// Asks one question and prints the rendered answer. Blank questions are ignored.
async fn ask_and_print(app: &App, question: &str, format: OutputFormat) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Ok(());
    }

    let answer = app.ask(question).await;
    println!("{}", render_answer(&answer, format));
    Ok(())
}

/// Reads questions from stdin until EOF or `exit`/`quit`.
async fn run_interactive(app: &App, format: OutputFormat) -> Result<()> {
    let show_prompt = format == OutputFormat::Text;
    if show_prompt {
        println!("{BANNER}");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if show_prompt {
            print!("{PROMPT}");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        ask_and_print(app, question, format).await?;
        if show_prompt && !question.is_empty() {
            println!();
        }
    }

    Ok(())
}
