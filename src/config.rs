//! @dose
//! purpose: Configuration file parsing for pydocs.toml. Holds the index file name,
//!     the module ignore list and directory exclusion globs used by the build command.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !CLI flags extend the list values and override the index name
//!
//! invariants:
//!     - Config::load returns default config if pydocs.toml doesn't exist
//!     - An unreadable or invalid file is reported and replaced by defaults
//!
//! gotchas:
//!     - Exclude patterns are matched against paths relative to the source directory

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Config file looked up in the project root
pub const CONFIG_FILE: &str = "pydocs.toml";

/// Default index name for `__init__.py` documents
pub const DEFAULT_INDEX: &str = "index";

/// Main configuration structure matching pydocs.toml
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Output name (without `.md`) for package `__init__.py` documents
    pub index: String,

    /// Dotted module names to skip
    pub ignore: Vec<String>,

    /// Exclusion globs for files and directories
    pub exclude: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: DEFAULT_INDEX.to_string(),
            ignore: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from pydocs.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.index, "index");
        assert!(config.ignore.is_empty());
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(Config::load(temp_dir.path()), Config::default());
    }

    #[test]
    fn test_load_basic_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"
index = "README"
ignore = ["pkg.settings", "pkg.migrations"]
exclude = ["tests/**"]
"#;
        fs::write(temp_dir.path().join(CONFIG_FILE), config_content).unwrap();

        let config = Config::load(temp_dir.path());
        assert_eq!(config.index, "README");
        assert_eq!(config.ignore, vec!["pkg.settings", "pkg.migrations"]);
        assert_eq!(config.exclude, vec!["tests/**"]);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "ignore = [\"a\"]\n").unwrap();

        let config = Config::load(temp_dir.path());
        assert_eq!(config.index, "index");
        assert_eq!(config.ignore, vec!["a"]);
    }

    #[test]
    fn test_invalid_config_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "index = [not toml").unwrap();
        assert_eq!(Config::load(temp_dir.path()), Config::default());
    }
}
