//! Configuration module
//!
//! Configuration priority:
//! 1. CLI flags (highest)
//! 2. Config file passed via `--config` (TOML)
//! 3. Built-in defaults (lowest)
//!
//! A config path given explicitly but unreadable or malformed is a fatal
//! startup error; no config path means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AdvisorError, AdvisorResult};

/// Default query service port
pub const DEFAULT_QUERY_PORT: u16 = 5111;

/// Default debounce window for repeated save-file events, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Advisor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port the query service listens on (loopback only)
    pub query_port: u16,

    /// Host the query service binds to
    pub query_host: String,

    /// Cache file the snapshot store persists to; `~` expands to the home
    /// directory. Empty string disables persistence.
    pub cache_file: Option<PathBuf>,

    /// Debounce window for repeated events on the same save file
    pub debounce_ms: u64,

    /// Endpoint of the external advisory client
    pub advisor_endpoint: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            query_port: DEFAULT_QUERY_PORT,
            query_host: "127.0.0.1".to_string(),
            cache_file: Some(PathBuf::from(".h3ai_cache.json")),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            advisor_endpoint: "http://localhost:5005/mcp".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| AdvisorError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| AdvisorError::InvalidConfig {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Cache file path with `~` expanded, or `None` if persistence is off
    pub fn resolved_cache_file(&self) -> Option<PathBuf> {
        let path = self.cache_file.as_ref()?;
        if path.as_os_str().is_empty() {
            return None;
        }
        Some(expand_home(path))
    }
}

/// Expand a leading `~` or `~/` to the user home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let p = path.to_string_lossy();
    if p == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }
    if let Some(rest) = p.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.query_port, 5111);
        assert_eq!(config.query_host, "127.0.0.1");
        assert_eq!(config.debounce_ms, 1000);
        assert_eq!(config.cache_file, Some(PathBuf::from(".h3ai_cache.json")));
    }

    #[test]
    fn test_load_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "query_port = 6222\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.query_port, 6222);
        assert_eq!(config.query_host, "127.0.0.1");
        assert_eq!(config.debounce_ms, 1000);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(AdvisorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_load_malformed_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "query_port = \"not a port").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(AdvisorError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_empty_cache_file_disables_persistence() {
        let config = Config {
            cache_file: Some(PathBuf::new()),
            ..Config::default()
        };
        assert_eq!(config.resolved_cache_file(), None);
    }

    #[test]
    fn test_expand_home_prefix() {
        let expanded = expand_home(Path::new("~/.h3ai/cache.json"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expanded, home.join(".h3ai/cache.json"));
        }
    }

    #[test]
    fn test_expand_home_leaves_plain_paths() {
        let path = Path::new("saves/cache.json");
        assert_eq!(expand_home(path), path.to_path_buf());
    }
}
