//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Selected mode and custom modes
//! - Auto-advance policy between phases
//! - Driver tick cadence
//! - Sound and notification toggles
//! - Heatmap window and session data location
//!
//! Configuration is stored at `~/.config/focusgrid/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::heatmap::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::session::AutoAdvance;
use crate::timer::{Mode, ModeSet};

/// A user-defined mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeConfig {
    pub name: String,
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusgrid/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default = "default_auto_advance_delay_ms")]
    pub auto_advance_delay_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_heatmap_days")]
    pub heatmap_days: u32,
    /// Session data file override. Defaults to `data.json` in the data dir.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default)]
    pub custom_modes: Vec<ModeConfig>,
}

// Default functions
fn default_mode() -> String {
    Mode::classic().name().to_string()
}
fn default_true() -> bool {
    true
}
fn default_auto_advance_delay_ms() -> u64 {
    500
}
fn default_tick_interval_ms() -> u64 {
    200
}
fn default_heatmap_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            auto_advance: true,
            auto_advance_delay_ms: default_auto_advance_delay_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            sound_enabled: true,
            notifications_enabled: true,
            heatmap_days: default_heatmap_days(),
            data_file: None,
            custom_modes: Vec::new(),
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

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let new_value = match obj.get(part) {
                    Some(serde_json::Value::Bool(_)) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))?,
                    ),
                    Some(serde_json::Value::Number(_)) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|e| invalid(format!("cannot parse '{value}' as number: {e}")))?;
                        serde_json::Value::Number(n.into())
                    }
                    Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    Some(_) => serde_json::Value::String(value.into()),
                    // Optional fields are absent from the serialized form.
                    None if Self::OPTIONAL_KEYS.contains(&key) => {
                        serde_json::Value::String(value.into())
                    }
                    None => return Err(ConfigError::UnknownKey(key.to_string())),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    const OPTIONAL_KEYS: &'static [&'static str] = &["data_file"];

    /// Location of `config.toml` in the data directory.
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. Returns error if the key is
    /// unknown or the resulting configuration is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new value names a mode that does not exist.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`]; also fails if the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Check that the selected mode exists and every custom mode is valid.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed custom mode, `InvalidModeSelection`
    /// for an unknown `mode`, `Config` for out-of-range numbers.
    pub fn validate(&self) -> Result<()> {
        self.selected_mode()?;
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            }
            .into());
        }
        if self.heatmap_days == 0 || self.heatmap_days > MAX_WINDOW_DAYS {
            return Err(ConfigError::InvalidValue {
                key: "heatmap_days".into(),
                message: format!("must be between 1 and {MAX_WINDOW_DAYS}"),
            }
            .into());
        }
        Ok(())
    }

    /// Built-in modes plus the configured custom modes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a custom mode has a zero duration.
    pub fn modes(&self) -> Result<ModeSet> {
        let mut set = ModeSet::builtin();
        for custom in &self.custom_modes {
            set.insert(Mode::new(
                custom.name.clone(),
                custom.focus_minutes,
                custom.break_minutes,
            )?);
        }
        Ok(set)
    }

    /// The mode named by `mode`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidModeSelection` if no such mode exists.
    pub fn selected_mode(&self) -> Result<Mode> {
        self.modes()?.get(&self.mode).cloned()
    }

    pub fn auto_advance_policy(&self) -> AutoAdvance {
        AutoAdvance {
            enabled: self.auto_advance,
            delay: Duration::from_millis(self.auto_advance_delay_ms),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Location of the session data document.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn data_file(&self) -> Result<PathBuf, CoreError> {
        match &self.data_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("data.json")),
        }
    }
}
