//! TOML-based application configuration.
//!
//! Stores launch-time options that are not part of the synced app state:
//! - Tick period of the timer driver
//! - The preset used on a fresh install
//! - Database file name
//!
//! Configuration is stored at `~/.config/ergon/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use super::database::DEFAULT_DATABASE_FILE;
use crate::error::ConfigError;
use crate::timer::{FocusPreset, DEFAULT_PRESET_ID};

/// Timer driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Preset used until the user picks another one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetConfig {
    #[serde(default = "default_focus_duration")]
    pub focus_duration: u32,
    #[serde(default = "default_short_break")]
    pub short_break: u32,
    #[serde(default = "default_long_break")]
    pub long_break: u32,
    #[serde(default = "default_sessions_before_long_break")]
    pub sessions_before_long_break: u32,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ergon/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub preset: PresetConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_focus_duration() -> u32 {
    25
}
fn default_short_break() -> u32 {
    5
}
fn default_long_break() -> u32 {
    15
}
fn default_sessions_before_long_break() -> u32 {
    4
}
fn default_database_file() -> String {
    DEFAULT_DATABASE_FILE.into()
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            sessions_before_long_break: default_sessions_before_long_break(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        key.split('.').try_fold(root, |node, part| node.get(part))
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(unknown());
        }

        let mut node = root;
        if let Some(parent_path) = parent_path {
            for part in parent_path.split('.') {
                node = node.get_mut(part).ok_or_else(unknown)?;
            }
        }
        let table = node.as_object_mut().ok_or_else(unknown)?;
        let existing = table.get(leaf).ok_or_else(unknown)?;

        let replacement = match existing {
            serde_json::Value::Bool(_) => value
                .parse::<bool>()
                .map(serde_json::Value::Bool)
                .map_err(|e| invalid(e.to_string()))?,
            serde_json::Value::Number(_) => value
                .parse::<u64>()
                .map(|n| serde_json::Value::Number(n.into()))
                .map_err(|_| invalid(format!("'{value}' is not a non-negative integer")))?,
            serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            _ => return Err(unknown()),
        };
        table.insert(leaf.to_string(), replacement);
        Ok(())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a leaf value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// type of the existing entry.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let as_invalid = |e: serde_json::Error| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        };
        let mut json = serde_json::to_value(&*self).map_err(as_invalid)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(as_invalid)?;
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms.max(1))
    }

    /// Preset built from the `[preset]` table.
    pub fn default_preset(&self) -> FocusPreset {
        FocusPreset {
            id: DEFAULT_PRESET_ID.into(),
            name: "Pomodoro".into(),
            work_duration: self.preset.focus_duration,
            break_duration: self.preset.short_break,
            long_break_duration: self.preset.long_break,
            sessions_before_long_break: self.preset.sessions_before_long_break,
        }
    }

    /// Database path, relative names resolved against the data directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let file = PathBuf::from(&self.storage.database_file);
        if file.is_absolute() {
            return Ok(file);
        }
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: file.clone(),
            message: e.to_string(),
        })?;
        Ok(dir.join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert_eq!(parsed.preset.focus_duration, 25);
        assert_eq!(parsed.storage.database_file, "ergon.db");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[preset]\nfocus_duration = 50\n").unwrap();
        assert_eq!(parsed.preset.focus_duration, 50);
        assert_eq!(parsed.preset.short_break, 5);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.tick_interval_ms").as_deref(), Some("1000"));
        assert_eq!(cfg.get("storage.database_file").as_deref(), Some("ergon.db"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("timer").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_number_and_string() {
        let mut cfg = Config::default();
        cfg.set("preset.long_break", "20").unwrap();
        cfg.set("storage.database_file", "other.db").unwrap();
        assert_eq!(cfg.preset.long_break, 20);
        assert_eq!(cfg.storage.database_file, "other.db");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("preset.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.set("timer", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_number() {
        let mut cfg = Config::default();
        let result = cfg.set("preset.focus_duration", "-5");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.preset.focus_duration, 25);
    }

    #[test]
    fn load_from_writes_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.preset.sessions_before_long_break, 4);
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn default_preset_follows_table() {
        let mut cfg = Config::default();
        cfg.preset.focus_duration = 50;
        cfg.preset.short_break = 10;
        let preset = cfg.default_preset();
        assert_eq!(preset.id, "pomodoro");
        assert_eq!(preset.work_duration, 50);
        assert_eq!(preset.break_duration, 10);
    }
}
