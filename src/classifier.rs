//! Response classification.
//!
//! Decides whether a reply from the generation service is a SQL statement to
//! execute or prose to show as-is. Matching is anchored at the start of the
//! reply, so an explanation that mentions SELECT mid-sentence stays prose.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Statement verbs that mark a reply as SQL.
pub const SQL_KEYWORDS: [&str; 12] = [
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP", "ALTER", "REPLACE", "TRUNCATE",
    "WITH", "GRANT", "REVOKE",
];

/// How a model response should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// The response should be executed against the database.
    SqlQuery,
    /// The response should be displayed verbatim.
    NaturalLanguage,
}

impl Classification {
    /// Returns true for `SqlQuery`.
    pub fn is_sql(&self) -> bool {
        matches!(self, Self::SqlQuery)
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SqlQuery => write!(f, "SQL query"),
            Self::NaturalLanguage => write!(f, "natural language"),
        }
    }
}

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(r"^({})\b", SQL_KEYWORDS.join("|"));
        Regex::new(&pattern).expect("keyword pattern is a valid regex")
    })
}

/// Classifies a model response.
///
/// `None` and empty input are natural language. The text is trimmed and
/// uppercased for matching only; callers keep the original for execution.
pub fn classify(text: Option<&str>) -> Classification {
    let Some(text) = text else {
        return Classification::NaturalLanguage;
    };
    if text.is_empty() {
        return Classification::NaturalLanguage;
    }

    let cleaned = text.trim().to_uppercase();
    if keyword_pattern().is_match(&cleaned) {
        Classification::SqlQuery
    } else {
        Classification::NaturalLanguage
    }
}

/// Returns true if `text` looks like a SQL statement.
pub fn is_sql_query(text: &str) -> bool {
    classify(Some(text)).is_sql()
}
