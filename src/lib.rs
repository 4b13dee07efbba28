//! chinook-query - Ask the Chinook music database questions in plain English.
//!
//! A language model turns each question into SQLite SQL, which runs against
//! the Chinook sample database. Replies that are not SQL are shown as prose.
//!
//! This library exposes the core modules for the binary and integration tests.

pub mod app;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod guard;
pub mod instruction;
pub mod llm;
pub mod logging;
pub mod render;
