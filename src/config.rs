//! Persistent configuration handling for Courier.
//!
//! Persists the tray-related preferences in a JSON file:
//! `~/.config/courier/config.json`.
//!
//! The tray code only ever needs two booleans (menu bar mode and Dock icon
//! visibility), so the store surface is a small typed get/set behind the
//! `SettingsStore` trait; tests swap in an in-memory implementation.

use std::fs;
use std::io;
use std::path::PathBuf;

use dirs::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};

const APP_CONFIG_DIR_NAME: &str = "courier";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No config directory available on this platform")]
    NoConfigDir,
}

/// Persisted boolean preferences the tray reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    /// App lives in the menu bar instead of running as a normal windowed app.
    MenuBarMode,
    /// macOS Dock icon visibility while in menu bar mode.
    ShowDockIcon,
}

impl PrefKey {
    /// Default used when the config file is missing or the field is unset.
    pub fn default_value(self) -> bool {
        match self {
            Self::MenuBarMode => false,
            Self::ShowDockIcon => true,
        }
    }
}

/// Typed get/set over the persisted preferences.
pub trait SettingsStore {
    fn get(&self, key: PrefKey) -> bool;
    fn set(&self, key: PrefKey, value: bool);
}

/// On-disk schema. Every field is optional so old and hand-edited files keep
/// loading; unset fields fall back to `PrefKey::default_value`.
#[derive(Debug, Serialize, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    menu_bar_mode: Option<bool>,
    #[serde(default)]
    show_dock_icon: Option<bool>,
}

fn default_config_path() -> Option<PathBuf> {
    let path = config_dir()?
        .join(APP_CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME);
    Some(path)
}

fn ensure_config_dir_exists(path: &std::path::Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// File-backed `SettingsStore`. Reads and writes go straight to disk on every
/// call; there is no cache to invalidate and the two booleans change rarely.
pub struct JsonSettingsStore {
    path: Option<PathBuf>,
}

impl JsonSettingsStore {
    /// Store at the platform config directory.
    pub fn new() -> Self {
        Self {
            path: default_config_path(),
        }
    }

    /// Store at an explicit file path (tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    fn load(&self) -> Result<RawConfig, ConfigError> {
        let Some(path) = &self.path else {
            debug!("No config_dir available, using defaults only");
            return Ok(RawConfig::default());
        };

        if !path.exists() {
            debug!(?path, "Config file does not exist, using defaults");
            return Ok(RawConfig::default());
        }

        let data = fs::read_to_string(path)?;
        let cfg = serde_json::from_str(&data)?;
        debug!(?path, "Config loaded");
        Ok(cfg)
    }

    fn save(&self, cfg: RawConfig) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            warn!("No config_dir available, skipping save");
            return Ok(());
        };

        ensure_config_dir_exists(path)?;
        let data = serde_json::to_string_pretty(&cfg)?;
        fs::write(path, data)?;
        debug!(?path, "Config saved");
        Ok(())
    }

    fn load_or_default(&self) -> RawConfig {
        match self.load() {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(error = ?err, "Failed to load existing config, starting fresh");
                RawConfig::default()
            }
        }
    }
}

impl Default for JsonSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get(&self, key: PrefKey) -> bool {
        let cfg = self.load_or_default();
        let value = match key {
            PrefKey::MenuBarMode => cfg.menu_bar_mode,
            PrefKey::ShowDockIcon => cfg.show_dock_icon,
        };
        value.unwrap_or_else(|| key.default_value())
    }

    fn set(&self, key: PrefKey, value: bool) {
        debug!(?key, value, "Saving preference");
        let mut cfg = self.load_or_default();
        match key {
            PrefKey::MenuBarMode => cfg.menu_bar_mode = Some(value),
            PrefKey::ShowDockIcon => cfg.show_dock_icon = Some(value),
        }
        if let Err(err) = self.save(cfg) {
            error!(error = ?err, "Failed to save config");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, JsonSettingsStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonSettingsStore::with_path(dir.path().join("config.json"));
        (dir, store)
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let (_dir, store) = temp_store();
        assert!(!store.get(PrefKey::MenuBarMode));
        assert!(store.get(PrefKey::ShowDockIcon));
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let (_dir, store) = temp_store();
        store.set(PrefKey::MenuBarMode, true);
        store.set(PrefKey::ShowDockIcon, false);
        assert!(store.get(PrefKey::MenuBarMode));
        assert!(!store.get(PrefKey::ShowDockIcon));
    }

    #[test]
    fn test_set_preserves_other_fields() {
        let (_dir, store) = temp_store();
        store.set(PrefKey::MenuBarMode, true);
        store.set(PrefKey::ShowDockIcon, false);
        store.set(PrefKey::MenuBarMode, false);
        assert!(!store.get(PrefKey::ShowDockIcon));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"menu_bar_mode": true, "theme": "dark"}"#).unwrap();
        let store = JsonSettingsStore::with_path(path);
        assert!(store.get(PrefKey::MenuBarMode));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        let store = JsonSettingsStore::with_path(path);
        assert!(store.get(PrefKey::ShowDockIcon));
    }
}
