//! Command-line argument parsing for chinook-query.
//!
//! Uses clap to parse CLI arguments. Every value here is optional so the
//! binary can layer flags over environment variables and the config file.

use crate::config::Config;
use crate::render::OutputFormat;
use clap::Parser;
use std::path::PathBuf;

/// Ask questions about the Chinook music store database in plain English.
#[derive(Parser, Debug)]
#[command(name = "chinook-query")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Ask a single question and exit instead of starting the prompt
    #[arg(short = 'q', long, value_name = "TEXT")]
    pub question: Option<String>,

    /// Path to the Chinook SQLite database file
    #[arg(long, value_name = "PATH", env = "CHINOOK_DB")]
    pub db: Option<PathBuf>,

    /// LLM provider: gemini, openai, ollama or mock
    #[arg(long, value_name = "PROVIDER", env = "CHINOOK_LLM")]
    pub llm: Option<String>,

    /// Model name for the selected provider
    #[arg(long, value_name = "NAME", env = "CHINOOK_MODEL")]
    pub model: Option<String>,

    /// Instruction preset: explorer or concise
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Read the instruction from a file instead of a preset
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub instruction_file: Option<PathBuf>,

    /// Refuse to run generated statements that modify the database
    #[arg(long)]
    pub read_only: bool,

    /// Output format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Returns the default log filter for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }

    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(db) = &self.db {
            config.database.path = db.clone();
        }
        if let Some(llm) = &self.llm {
            config.llm.provider = llm.clone();
        }
        if let Some(model) = &self.model {
            config.llm.model = Some(model.clone());
        }
        if let Some(preset) = &self.preset {
            config.instruction.preset = preset.clone();
            config.instruction.file = None;
        }
        if let Some(file) = &self.instruction_file {
            config.instruction.file = Some(file.clone());
        }
        if self.read_only {
            config.database.read_only = true;
        }
    }
}
