//! Saving and restoring filter sets as JSON.

use crate::filter::{FilterRuleError, FilterSet, FilterSetConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Default location of the saved filter set: `<data_dir>/logsieve/filters.json`.
pub fn default_state_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("logsieve").join("filters.json"))
}

/// Write a filter set as pretty JSON, creating parent directories as needed.
pub fn save_filter_set(path: &Path, filters: &FilterSet) -> Result<(), PersistenceError> {
    save_config(path, &filters.to_config())
}

/// Read a filter set.
///
/// Rules whose patterns no longer compile are left out and returned next to
/// the set; the remaining rules still load.
pub fn load_filter_set(path: &Path) -> Result<(FilterSet, Vec<FilterRuleError>), PersistenceError> {
    let config = load_config(path)?;
    Ok(FilterSet::from_config(&config))
}

pub fn save_config(path: &Path, config: &FilterSetConfig) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
        }
    }

    let content = serde_json::to_string_pretty(config).map_err(|source| PersistenceError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(|e| PersistenceError::io(path, e))?;
    tracing::debug!(path = %path.display(), "saved filter set");
    Ok(())
}

pub fn load_config(path: &Path) -> Result<FilterSetConfig, PersistenceError> {
    let content = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_str(&content).map_err(|source| PersistenceError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
