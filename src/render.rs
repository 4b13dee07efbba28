//! Answer rendering.
//!
//! Turns an [`Answer`] into terminal text (a boxed result table) or a
//! single-line JSON object for scripting.

use crate::app::Answer;
use crate::db::{QueryResult, Row, Value};
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Output format for answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with boxed tables.
    #[default]
    Text,
    /// One JSON object per answer.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {s}. Expected: text or json")),
        }
    }
}

/// Renders an answer in the requested format.
pub fn render_answer(answer: &Answer, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(answer),
        OutputFormat::Json => render_json(answer),
    }
}

/// Renders an answer for the terminal.
pub fn render_text(answer: &Answer) -> String {
    match answer {
        Answer::Rows { sql, result } => {
            let mut lines = vec![
                "Generated SQL:".to_string(),
                sql.trim().to_string(),
                String::new(),
            ];
            lines.extend(ResultTable::new(result).render_to_lines());
            lines.join("\n")
        }
        Answer::QueryFailed { sql, error } => format!(
            "Generated SQL:\n{}\n\nError executing SQL: {}",
            sql.trim(),
            error
        ),
        Answer::Text(text) => text.clone(),
        Answer::GenerationFailed(error) => format!("{}: {}", error.category(), error),
    }
}

#[derive(Serialize)]
struct JsonAnswer<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<&'a [Row]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> JsonAnswer<'a> {
    fn empty(kind: &'static str) -> Self {
        Self {
            kind,
            sql: None,
            columns: None,
            rows: None,
            row_count: None,
            execution_ms: None,
            text: None,
            error: None,
        }
    }
}

/// Renders an answer as a compact JSON object.
pub fn render_json(answer: &Answer) -> String {
    let json = match answer {
        Answer::Rows { sql, result } => JsonAnswer {
            sql: Some(sql.as_str()),
            columns: Some(result.column_names()),
            rows: Some(result.rows.as_slice()),
            row_count: Some(result.row_count),
            execution_ms: Some(
                u64::try_from(result.execution_time.as_millis()).unwrap_or(u64::MAX),
            ),
            ..JsonAnswer::empty("rows")
        },
        Answer::QueryFailed { sql, error } => JsonAnswer {
            sql: Some(sql.as_str()),
            error: Some(error.to_string()),
            ..JsonAnswer::empty("query_error")
        },
        Answer::Text(text) => JsonAnswer {
            text: Some(text.as_str()),
            ..JsonAnswer::empty("text")
        },
        Answer::GenerationFailed(error) => JsonAnswer {
            error: Some(error.to_string()),
            ..JsonAnswer::empty("generation_error")
        },
    };

    // Only strings, numbers and byte arrays go in, so this cannot fail.
    serde_json::to_string(&json)
        .unwrap_or_else(|e| format!(r#"{{"kind":"internal_error","error":"{e}"}}"#))
}

/// Plain-text table for a query result, with column headers and auto-sized columns.
pub struct ResultTable<'a> {
    result: &'a QueryResult,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table.
    pub fn new(result: &'a QueryResult) -> Self {
        Self { result }
    }

    /// Calculates the width for each column, in terminal cells.
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .result
            .columns
            .iter()
            .map(|col| col.name.width().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in &self.result.rows {
            for (width, value) in widths.iter_mut().zip(row) {
                *width = (*width).max(value.to_display_string().width());
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.width() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            Self::take_width(s, max_width)
        } else {
            format!("{}...", Self::take_width(s, max_width - 3))
        }
    }

    /// Longest prefix of `s` that fits in `width` terminal cells.
    fn take_width(s: &str, width: usize) -> String {
        let mut used = 0;
        let mut kept = String::new();
        for c in s.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            kept.push(c);
        }
        kept
    }

    /// Renders the table and its footer as lines.
    pub fn render_to_lines(&self) -> Vec<String> {
        if self.result.columns.is_empty() {
            return vec!["(statement executed, no rows)".to_string()];
        }

        let widths = self.calculate_column_widths();
        let mut lines = Vec::with_capacity(self.result.rows.len() + 5);

        lines.push(Self::render_border(&widths, '┌', '┬', '┐'));
        let headers: Vec<String> = self.result.columns.iter().map(|c| c.name.clone()).collect();
        lines.push(Self::render_cells(&headers, &widths));
        lines.push(Self::render_border(&widths, '├', '┼', '┤'));

        for row in &self.result.rows {
            let cells: Vec<String> = row.iter().map(Value::to_display_string).collect();
            lines.push(Self::render_cells(&cells, &widths));
        }

        lines.push(Self::render_border(&widths, '└', '┴', '┘'));
        lines.push(format!(
            "{} row{} returned ({}ms)",
            self.result.row_count,
            if self.result.row_count == 1 { "" } else { "s" },
            self.result.execution_time.as_millis()
        ));

        lines
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(&mid.to_string()))
    }

    fn render_cells(cells: &[String], widths: &[usize]) -> String {
        let mut line = String::from("│");
        for (i, &width) in widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let truncated = Self::truncate(cell, width);
            // Padding by char count would misalign double-width text.
            let padding = " ".repeat(width.saturating_sub(truncated.width()));
            line.push_str(&format!(" {truncated}{padding} │"));
        }
        line
    }
}
