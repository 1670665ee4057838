//! Config loading for logsieve.
//!
//! Loads YAML config files and validates rule and column names.

use std::fs;
use std::path::{Path, PathBuf};

use crate::colors::{parse_color, Rgb};
use crate::columns::{Column, ColumnInfo, Columns};
use crate::config::discovery::DiscoveryResult;
use crate::config::error::{suggest, ConfigError};
use crate::config::types::{RawColumn, RawConfig, RawRule, ViewConfig};
use crate::filter::{MatchKind, RuleAction, RuleConfig};

/// Load and parse a YAML config file.
///
/// Returns the parsed RawConfig or a ConfigError with location and suggestions.
fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    // Read file content
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    // A file holding only comments is an empty config
    let is_blank = content
        .lines()
        .map(str::trim)
        .all(|l| l.is_empty() || l.starts_with('#'));
    if is_blank {
        return Ok(RawConfig::default());
    }

    // Parse YAML with serde-saphyr
    serde_saphyr::from_str(&content)
        .map_err(|e| ConfigError::from_saphyr_error(path.to_path_buf(), e))
}

fn validation(path: &Path, message: String, suggestion: Option<String>) -> ConfigError {
    ConfigError::Validation {
        path: path.to_path_buf(),
        message,
        suggestion,
    }
}

fn parse_action(path: &Path, name: &str) -> Result<RuleAction, ConfigError> {
    RuleAction::ALL
        .into_iter()
        .find(|action| action.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            validation(
                path,
                format!("unknown filter action '{}'", name),
                suggest(name, RuleAction::ALL.map(RuleAction::name)),
            )
        })
}

fn parse_match_kind(path: &Path, name: &str) -> Result<MatchKind, ConfigError> {
    MatchKind::ALL
        .into_iter()
        .find(|kind| kind.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            validation(
                path,
                format!("unknown match kind '{}'", name),
                suggest(name, MatchKind::ALL.map(MatchKind::name)),
            )
        })
}

fn parse_column(path: &Path, name: &str) -> Result<Column, ConfigError> {
    Column::ALL
        .into_iter()
        .find(|column| column.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            validation(
                path,
                format!("unknown column '{}'", name),
                suggest(name, Column::ALL.map(Column::name)),
            )
        })
}

fn parse_rule_color(path: &Path, value: Option<&str>, default: Rgb) -> Result<Rgb, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => parse_color(value).map_err(|e| validation(path, e, None)),
    }
}

fn validate_rules(path: &Path, raw: &[RawRule]) -> Result<Vec<RuleConfig>, ConfigError> {
    raw.iter()
        .map(|rule| {
            let match_kind = match &rule.match_kind {
                Some(name) => parse_match_kind(path, name)?,
                None => MatchKind::default(),
            };
            Ok(RuleConfig {
                pattern: rule.pattern.clone(),
                match_kind,
                action: parse_action(path, &rule.action)?,
                background: parse_rule_color(path, rule.background.as_deref(), Rgb::WHITE)?,
                foreground: parse_rule_color(path, rule.foreground.as_deref(), Rgb::BLACK)?,
                enabled: rule.enabled.unwrap_or(true),
            })
        })
        .collect()
}

fn validate_columns(path: &Path, raw: &[RawColumn]) -> Result<Columns, ConfigError> {
    let infos = raw
        .iter()
        .map(|entry| {
            let column = parse_column(path, &entry.column)?;
            let default = ColumnInfo::new(column);
            Ok(ColumnInfo {
                column,
                enable: entry.enable.unwrap_or(default.enable),
                width: entry.width.unwrap_or(default.width),
                order: entry.order.unwrap_or(default.order),
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(Columns::from_infos(&infos))
}

/// Apply the fields present in one file on top of `config`.
fn apply(config: &mut ViewConfig, path: &Path, raw: RawConfig) -> Result<(), ConfigError> {
    if let Some(clock_time) = raw.clock_time {
        config.clock_time = clock_time;
    }
    if let Some(columns) = &raw.columns {
        config.columns = validate_columns(path, columns)?;
    }
    if let Some(rules) = &raw.message_filters {
        config.filters.message_filters = validate_rules(path, rules)?;
    }
    if let Some(rules) = &raw.process_filters {
        config.filters.process_filters = validate_rules(path, rules)?;
    }
    Ok(())
}

/// Load a single config file on top of the defaults.
pub fn load_single_file(path: &Path) -> Result<ViewConfig, ConfigError> {
    let mut config = ViewConfig::default();
    apply(&mut config, path, load_file(path)?)?;
    Ok(config)
}

/// Load config from discovered config files.
///
/// The global config is applied first; fields present in the project config
/// replace it. Returns the defaults if no config files exist.
pub fn load(discovery: &DiscoveryResult) -> Result<ViewConfig, ConfigError> {
    let mut config = ViewConfig::default();

    let files: [&Option<PathBuf>; 2] = [&discovery.global_config, &discovery.project_config];
    for path in files.into_iter().flatten() {
        let raw = load_file(path)?;
        apply(&mut config, path, raw)?;
        tracing::debug!(path = %path.display(), "loaded config");
    }

    Ok(config)
}
