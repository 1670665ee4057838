//! Config discovery for logsieve.
//!
//! Walks parent directories to find `logsieve.yaml` and checks for global config
//! at `<config_dir>/logsieve/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "logsieve.yaml";

/// Global config filename within the logsieve config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Directory containing `logsieve.yaml` (the project root).
    pub project_root: Option<PathBuf>,
    /// Full path to the project config file (`logsieve.yaml`).
    pub project_config: Option<PathBuf>,
    /// Full path to the global config file.
    pub global_config: Option<PathBuf>,
}

impl DiscoveryResult {
    /// Returns true if any config was found (project or global).
    pub fn has_config(&self) -> bool {
        self.project_config.is_some() || self.global_config.is_some()
    }
}

fn is_file(path: &Path) -> bool {
    path.try_exists().unwrap_or(false) && path.is_file()
}

/// Default global config path, whether or not it exists.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logsieve").join(GLOBAL_CONFIG_NAME))
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    let cwd = std::env::current_dir()
        .ok()
        .map(|dir| dir.canonicalize().unwrap_or(dir));
    discover_from(cwd.as_deref(), global_config_path().as_deref())
}

/// Discover config files walking up from `start`, with `global` as the
/// candidate global config.
pub fn discover_from(start: Option<&Path>, global: Option<&Path>) -> DiscoveryResult {
    let mut result = DiscoveryResult {
        global_config: global.filter(|p| is_file(p)).map(Path::to_path_buf),
        ..Default::default()
    };

    let Some(start) = start else {
        return result;
    };

    // Walk ancestors looking for logsieve.yaml
    for ancestor in start.ancestors() {
        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        if is_file(&config_path) {
            result.project_root = Some(ancestor.to_path_buf());
            result.project_config = Some(config_path);
            break;
        }
    }

    result
}
