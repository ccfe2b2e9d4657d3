//! Configuration management
//!
//! `settings.json` lives in the data directory:
//! ```json
//! {
//!   "storage": "file",
//!   "server": { "host": "127.0.0.1", "port": 3000 },
//!   "defaultDelimiter": ";"
//! }
//! ```
//! Keys this crate does not know about are kept when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::Delimiter;

pub const SETTINGS_FILE: &str = "settings.json";

/// Where the blob and transaction stores keep their data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One JSON file per key in the data directory
    #[default]
    File,
    /// Process memory, gone on exit
    Memory,
}

impl std::str::FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "file" => Ok(StorageKind::File),
            "memory" => Ok(StorageKind::Memory),
            other => Err(Error::Config(format!("Unknown storage kind: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    storage: StorageKind,
    #[serde(default)]
    server: ServerSettings,
    #[serde(default)]
    default_delimiter: Delimiter,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Tally configuration (settings file plus environment overrides)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub storage: StorageKind,
    pub server: ServerSettings,
    pub default_delimiter: Delimiter,
}

impl Config {
    /// Load config from the data directory
    ///
    /// A missing or unreadable settings file gives the defaults. These
    /// environment variables override the file:
    /// - `TALLY_STORAGE` (`file` or `memory`)
    /// - `TALLY_HOST`
    /// - `TALLY_PORT`
    pub fn load(dir: &Path) -> Result<Self> {
        Self::load_with_env(dir, |key| std::env::var(key).ok())
    }

    /// Load only what `settings.json` says, ignoring the environment
    ///
    /// Use this before [`Config::save`] so overrides are not written back.
    pub fn load_file(dir: &Path) -> Result<Self> {
        Self::load_with_env(dir, |_| None)
    }

    fn load_with_env(dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(dir)?;

        let mut config = Self {
            storage: raw.storage,
            server: raw.server,
            default_delimiter: raw.default_delimiter,
        };

        if let Some(storage) = env("TALLY_STORAGE") {
            config.storage = storage.parse()?;
        }
        if let Some(host) = env("TALLY_HOST") {
            config.server.host = host;
        }
        if let Some(port) = env("TALLY_PORT") {
            config.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid TALLY_PORT: {}", port)))?;
        }

        Ok(config)
    }

    /// Save config to the data directory
    /// Preserves settings this crate doesn't manage
    pub fn save(&self, dir: &Path) -> Result<()> {
        let mut settings = read_settings(dir)?;

        settings.storage = self.storage;
        settings.server = self.server.clone();
        settings.default_delimiter = self.default_delimiter;

        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }

    /// `host:port` for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn read_settings(dir: &Path) -> Result<SettingsFile> {
    let path = dir.join(SETTINGS_FILE);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content).unwrap_or_default())
}

/// Data directory: `TALLY_DIR` if set, else `~/.tally`
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("TALLY_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".tally"))
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_with_env(dir.path(), no_env).unwrap();

        assert_eq!(config.storage, StorageKind::File);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.default_delimiter, Delimiter::Semicolon);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ nope").unwrap();

        let config = Config::load_with_env(dir.path(), no_env).unwrap();
        assert_eq!(config.storage, StorageKind::File);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"storage": "file", "server": {"host": "0.0.0.0", "port": 8080}, "defaultDelimiter": ","}"#,
        )
        .unwrap();

        let env = |key: &str| match key {
            "TALLY_STORAGE" => Some("memory".to_string()),
            "TALLY_PORT" => Some("9000".to_string()),
            _ => None,
        };
        let config = Config::load_with_env(dir.path(), env).unwrap();

        assert_eq!(config.storage, StorageKind::Memory);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert_eq!(config.default_delimiter, Delimiter::Comma);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let dir = TempDir::new().unwrap();
        let env = |key: &str| (key == "TALLY_PORT").then(|| "http".to_string());
        assert!(matches!(Config::load_with_env(dir.path(), env), Err(Error::Config(_))));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{"theme": "dark"}"#).unwrap();

        let mut config = Config::load_file(dir.path()).unwrap();
        config.default_delimiter = Delimiter::Tab;
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(SETTINGS_FILE)).unwrap()).unwrap();
        assert_eq!(saved["theme"], "dark");
        assert_eq!(saved["defaultDelimiter"], "\t");
    }
}
