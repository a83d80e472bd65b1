//! Application configuration
//!
//! Read once at startup from `config.json` in the platform config directory
//! (or the file named by `AUDIOSWITCH_CONFIG`). A missing file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "audioswitch";
const APP_NAME: &str = "AudioSwitch";
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "AUDIOSWITCH_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub hotkeys_enabled: bool,
    pub show_switch_confirmation: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkeys_enabled: true,
            show_switch_confirmation: true,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Unknown level names fall back to INFO
    pub fn max_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "hotkeys_enabled": false }}"#).unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();

        assert!(!config.hotkeys_enabled);
        assert!(config.show_switch_confirmation);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_log_level_parsing() {
        let mut config = AppConfig::default();
        assert_eq!(config.max_level(), tracing::Level::INFO);

        config.log_level = "debug".to_string();
        assert_eq!(config.max_level(), tracing::Level::DEBUG);

        config.log_level = "chatty".to_string();
        assert_eq!(config.max_level(), tracing::Level::INFO);
    }
}
