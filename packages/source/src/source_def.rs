//! Config-driven spreadsheet source definition.
//!
//! A [`SourceDefinition`] names where the incident workbook lives and which
//! header holds each incident field, so a re-published sheet with renamed
//! columns only needs a TOML change.

use serde::Deserialize;

use crate::SourceError;

fn default_max_retries() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    120
}

/// A complete incident spreadsheet source.
///
/// Loaded from TOML files embedded at compile time (see
/// [`crate::registry`]).
#[derive(Debug, Clone, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"caic"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Download URL of the `.xlsx` workbook.
    pub url: String,
    /// Human-readable page describing the dataset, if any.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Worksheet to read. The first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
    /// Retries for transient HTTP failures.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Header names of the incident fields.
    pub fields: FieldMapping,
}

/// Header names in the first row of the worksheet.
///
/// Headers are matched case-insensitively after trimming.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldMapping {
    /// Incident date.
    pub date: String,
    /// Primary activity category.
    pub primary_activity: String,
    /// Two-letter state code.
    pub state: String,
    /// Free-text location.
    pub location: String,
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lon: String,
    /// Number of people killed.
    pub killed: String,
    /// Month number. Derived from the date when absent from the sheet.
    #[serde(default)]
    pub month: Option<String>,
}

/// Parses a TOML source definition.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if the document is malformed or misses a
/// required key.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    Ok(toml::from_str(toml_str)?)
}
