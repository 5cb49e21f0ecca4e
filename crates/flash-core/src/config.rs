//! Configuration for flash
//!
//! Stored in `<config dir>/flash/config.toml`

use crate::storage::DEFAULT_STORAGE_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// flash configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the saved groups (defaults to the platform data dir)
    pub data_dir: Option<PathBuf>,

    /// Storage key of the saved group mapping
    pub storage_key: String,

    /// Seed file to use instead of the bundled dataset
    pub seed_path: Option<PathBuf>,

    /// Card generation settings
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Display settings
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_path: None,
            generation: GenerationConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Card generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Delay before generated cards are placed, in milliseconds
    pub latency_ms: u64,

    /// Cards per request when no count is given
    pub default_count: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            latency_ms: 700,
            default_count: 5,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use colors in output
    pub colors: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { colors: true }
    }
}

impl Config {
    /// Default config file location (e.g. ~/.config/flash/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("flash").join("config.toml"))
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save config to a TOML file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data directory: explicit override, then config, then platform default
    pub fn resolve_data_dir(&self, override_dir: Option<&Path>) -> crate::Result<PathBuf> {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.data_dir.clone())
            .or_else(crate::storage::FileStorage::default_dir)
            .ok_or_else(|| crate::Error::Config("No data directory available".to_string()))
    }

    /// Set a value by dotted key (e.g. `generation.latency_ms`)
    pub fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let invalid = |kind: &str| crate::Error::Config(format!("Invalid {} value: {}", kind, value));
        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "storage_key" => self.storage_key = value.to_string(),
            "seed_path" => self.seed_path = Some(PathBuf::from(value)),
            "generation.latency_ms" => {
                self.generation.latency_ms = value.parse().map_err(|_| invalid("integer"))?;
            }
            "generation.default_count" => {
                self.generation.default_count = value.parse().map_err(|_| invalid("integer"))?;
            }
            "display.colors" => {
                self.display.colors = value.parse().map_err(|_| invalid("boolean"))?;
            }
            _ => return Err(crate::Error::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    /// Generate a default config file with comments
    pub fn default_with_comments() -> String {
        r#"# flash configuration

# Directory holding saved groups (defaults to the platform data directory)
# data_dir = "/home/me/.local/share/flash"

# Storage key of the saved group mapping
storage_key = "flashcard_groups_v6_data"

# Seed file used instead of the bundled sample groups
# seed_path = "/home/me/flash-seed.json"

[generation]
# Delay before generated cards are placed, in milliseconds
latency_ms = 700

# Cards per request when no count is given
default_count = 5

[display]
# Use colors in output
colors = true
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commented_default_matches_default() {
        let parsed: Config = toml::from_str(&Config::default_with_comments()).unwrap();
        let default = Config::default();
        assert_eq!(parsed.storage_key, default.storage_key);
        assert_eq!(parsed.generation.latency_ms, default.generation.latency_ms);
        assert_eq!(parsed.generation.default_count, default.generation.default_count);
        assert_eq!(parsed.display.colors, default.display.colors);
        assert!(parsed.data_dir.is_none());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flash").join("config.toml");

        let mut config = Config::default();
        config.set("generation.latency_ms", "0").unwrap();
        config.set("storage_key", "custom").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.generation.latency_ms, 0);
        assert_eq!(loaded.storage_key, "custom");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("display.colors", "maybe").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_data_dir_precedence() {
        let mut config = Config::default();
        config.data_dir = Some(PathBuf::from("/from/config"));
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/flag"))).unwrap(),
            PathBuf::from("/from/flag")
        );
        assert_eq!(
            config.resolve_data_dir(None).unwrap(),
            PathBuf::from("/from/config")
        );
    }
}
