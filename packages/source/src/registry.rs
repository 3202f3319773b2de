//! Source registry: the embedded TOML source definitions.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! with [`include_str!`]. Adding a mirror or a newer edition of the
//! spreadsheet means adding a file and a line below.

use crate::SourceError;
use crate::source_def::{SourceDefinition, parse_source_toml};

/// Id of the source used when none is chosen.
pub const DEFAULT_SOURCE_ID: &str = "caic";

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[("caic", include_str!("../sources/caic.toml"))];

/// Returns every configured source definition.
///
/// # Errors
///
/// Returns [`SourceError::Toml`] if an embedded config is malformed.
pub fn all_sources() -> Result<Vec<SourceDefinition>, SourceError> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).inspect_err(|e| log::error!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Looks up a source definition by id.
///
/// # Errors
///
/// Returns [`SourceError::UnknownSource`] if no source has that id, or
/// [`SourceError::Toml`] if its config is malformed.
pub fn find_source(id: &str) -> Result<SourceDefinition, SourceError> {
    all_sources()?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| SourceError::UnknownSource { id: id.to_string() })
}

/// The default CAIC source.
///
/// # Errors
///
/// See [`find_source`].
pub fn default_source() -> Result<SourceDefinition, SourceError> {
    find_source(DEFAULT_SOURCE_ID)
}
