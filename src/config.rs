use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

/// # Config
///
/// Scene-wide settings. Every flag defaults to off.
///
/// ```ron
/// (
///     default_sortable_children: true,
///     debug: false,
/// )
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether newly spawned objects keep their children sorted by z-index.
    pub default_sortable_children: bool,
    /// Whether every object carries a debug axis overlay.
    pub debug: bool,
}

impl Config {
    /// Parses the configuration from RON text.
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Loads the configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    /// Serializes the configuration to pretty RON text.
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// # Config Error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file couldn't be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The text isn't valid RON for [Config].
    #[error("parse error: {0}")]
    Parse(String),

    /// The configuration couldn't be written.
    #[error("serialization error: {0}")]
    Serialize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_ron_reads_flags() {
        let config = Config::from_ron("(default_sortable_children: true, debug: true)").unwrap();

        assert!(config.default_sortable_children);
        assert!(config.debug);
    }

    #[test]
    fn from_ron_missing_fields_returns_defaults() {
        let config = Config::from_ron("(debug: true)").unwrap();

        assert_eq!(
            config,
            Config {
                default_sortable_children: false,
                debug: true,
            }
        );
    }

    #[test]
    fn from_ron_invalid_text_returns_parse_error() {
        let result = Config::from_ron("(debug: maybe)");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn to_ron_from_ron_returns_same_config() {
        let config = Config {
            default_sortable_children: true,
            debug: false,
        };

        let text = config.to_ron().unwrap();

        assert_eq!(Config::from_ron(&text).unwrap(), config);
    }

    #[test]
    fn load_missing_file_returns_io_error() {
        let result = Config::load("/definitely/not/here/sprig.ron");

        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
