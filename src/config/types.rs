//! Config types for logsieve.
//!
//! Defines structures for parsing and representing configuration files.

use crate::columns::Columns;
use crate::filter::FilterSetConfig;
use serde::Deserialize;

/// Raw config file structure (used for parsing).
///
/// This struct directly mirrors the YAML config file structure.
/// Unknown fields are rejected with an error. Every field is optional so a
/// project file can override the global one field by field.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Show wall-clock time instead of seconds since capture start.
    pub clock_time: Option<bool>,
    /// Column layout overrides.
    pub columns: Option<Vec<RawColumn>>,
    /// Rules tested against the message text.
    pub message_filters: Option<Vec<RawRule>>,
    /// Rules tested against the process name.
    pub process_filters: Option<Vec<RawRule>>,
}

/// Raw column entry. Names are validated after parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawColumn {
    pub column: String,
    pub enable: Option<bool>,
    pub width: Option<u32>,
    pub order: Option<i32>,
}

/// Raw filter rule as written in the config file.
///
/// Action and match kind stay strings here so misspellings get a suggestion
/// instead of a bare serde error.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawRule {
    pub pattern: String,
    pub match_kind: Option<String>,
    pub action: String,
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub enabled: Option<bool>,
}

/// Validated view configuration merged from global and project files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewConfig {
    pub clock_time: bool,
    pub columns: Columns,
    pub filters: FilterSetConfig,
}
