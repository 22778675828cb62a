mod config;
pub mod document;
pub mod store;

pub use config::{Config, ModeConfig};
pub use document::{DayTotals, SessionDocument};
pub use store::{JsonFileStore, MemoryStore, SessionStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/focusgrid[-dev]/` based on FOCUSGRID_ENV.
///
/// Set FOCUSGRID_ENV=dev to use the development data directory, or
/// FOCUSGRID_HOME to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("FOCUSGRID_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSGRID_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusgrid-dev")
            } else {
                base_dir.join("focusgrid")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
