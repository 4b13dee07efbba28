//! The instruction sent to the generation service with every question.
//!
//! Two presets describe the Chinook schema and the response rules with
//! slightly different wording. A custom instruction can be loaded from a file
//! instead. Whichever is chosen stays fixed for the lifetime of the process.

use crate::error::{ChinookError, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Table and column listing shared by both presets.
const CHINOOK_SCHEMA: &str = r#"1. The SQL table ARTIST has the columns ArtistId INTEGER, Name NVARCHAR(120).
2. The SQL table ALBUM has the columns AlbumId INTEGER, Title NVARCHAR(160), ArtistId INTEGER.
3. The SQL table TRACK has the columns TrackId INTEGER, Name NVARCHAR(200), AlbumId INTEGER, MediaTypeId INTEGER, GenreId INTEGER, Composer NVARCHAR(220), Milliseconds INTEGER, Bytes INTEGER, UnitPrice NUMERIC(10,2).
4. The SQL table GENRE has the columns GenreId INTEGER, Name NVARCHAR(120).
5. The SQL table MEDIATYPE has the columns MediaTypeId INTEGER, Name NVARCHAR(120).
6. The SQL table PLAYLIST has the columns PlaylistId INTEGER, Name NVARCHAR(120).
7. The SQL table PLAYLISTTRACK has the columns PlaylistId INTEGER, TrackId INTEGER.
8. The SQL table CUSTOMER has the columns CustomerId INTEGER, FirstName NVARCHAR(40), LastName NVARCHAR(20), Company NVARCHAR(80), Address NVARCHAR(70), City NVARCHAR(40), State NVARCHAR(40), Country NVARCHAR(40), PostalCode NVARCHAR(10), Phone NVARCHAR(24), Fax NVARCHAR(24), Email NVARCHAR(60), SupportRepId INTEGER.
9. The SQL table EMPLOYEE has the columns EmployeeId INTEGER, LastName NVARCHAR(20), FirstName NVARCHAR(20), Title NVARCHAR(30), ReportsTo INTEGER, BirthDate DATETIME, HireDate DATETIME, Address NVARCHAR(70), City NVARCHAR(40), State NVARCHAR(40), Country NVARCHAR(40), PostalCode NVARCHAR(10), Phone NVARCHAR(24), Fax NVARCHAR(24), Email NVARCHAR(60).
10. The SQL table INVOICE has the columns InvoiceId INTEGER, CustomerId INTEGER, InvoiceDate DATETIME, BillingAddress NVARCHAR(70), BillingCity NVARCHAR(40), BillingState NVARCHAR(40), BillingCountry NVARCHAR(40), BillingPostalCode NVARCHAR(10), Total NUMERIC(10,2).
11. The SQL table INVOICELINE has the columns InvoiceLineId INTEGER, InvoiceId INTEGER, TrackId INTEGER, UnitPrice NUMERIC(10,2), Quantity INTEGER."#;

/// Reply used for questions about the app itself.
pub const ABOUT_REPLY: &str = "I am a demo app built to showcase how a language model can translate natural language into SQL queries for the Chinook music database.";

const EXPLORER_TEMPLATE: &str = r#"You are an expert assistant that helps users query the Chinook music store database using SQL.

The Chinook database has the following main tables and columns:
{schema}

Rules:
- If the user asks factual questions about the database schema or contents, explain them briefly (under 700 words).
- If the user asks a question that requires data retrieval, return only the SQL query. No explanations, no formatting, and no markdown (no ``` and no "SQL" label).
- If the user asks questions like:
    * "Who made you?"
    * "What project is this?"
    * "What are you for?"
    * "Tell me about yourself."
  then respond in natural language as:
    "{about}"
- Never generate SQL for such meta-questions."#;

const CONCISE_TEMPLATE: &str = r#"You translate English questions into SQLite queries for the Chinook music store database.

Tables:
{schema}

Answer with the bare SQL statement only, without code fences or commentary.
If the question is about the schema itself, answer in a few plain sentences.
If the question is about you or this project, answer exactly: "{about}""#;

/// Named instruction variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstructionPreset {
    /// Detailed rules with examples of meta-questions.
    #[default]
    Explorer,
    /// Shorter wording with the same schema.
    Concise,
}

impl InstructionPreset {
    /// Returns the preset name as used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Concise => "concise",
        }
    }

    fn template(&self) -> &'static str {
        match self {
            Self::Explorer => EXPLORER_TEMPLATE,
            Self::Concise => CONCISE_TEMPLATE,
        }
    }
}

impl FromStr for InstructionPreset {
    type Err = ChinookError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "explorer" => Ok(Self::Explorer),
            "concise" => Ok(Self::Concise),
            _ => Err(ChinookError::config(format!(
                "Unknown instruction preset '{s}'. Expected: explorer or concise"
            ))),
        }
    }
}

impl fmt::Display for InstructionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The system instruction. Cheap to clone; the text is shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    text: Arc<str>,
}

impl Instruction {
    /// Builds the instruction for a preset.
    pub fn preset(preset: InstructionPreset) -> Self {
        let text = preset
            .template()
            .replace("{schema}", CHINOOK_SCHEMA)
            .replace("{about}", ABOUT_REPLY);
        Self {
            text: Arc::from(text),
        }
    }

    /// Wraps custom instruction text.
    pub fn custom(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ChinookError::config("Instruction text is empty"));
        }
        Ok(Self {
            text: Arc::from(text),
        })
    }

    /// Loads a custom instruction from a text file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ChinookError::config(format!(
                "Failed to read instruction file {}: {e}",
                path.display()
            ))
        })?;
        Self::custom(text).map_err(|_| {
            ChinookError::config(format!("Instruction file {} is empty", path.display()))
        })
    }

    /// Returns the instruction text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::preset(InstructionPreset::default())
    }
}
