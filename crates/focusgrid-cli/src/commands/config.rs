//! `config` subcommand: read and edit `config.toml` by dot-separated key.
//!
//! Every write goes through [`Config::set`], so a value that names an unknown
//! mode or falls outside its range is rejected before it reaches disk.

use clap::Subcommand;
use focusgrid_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "mode", "auto_advance_delay_ms")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values, with the resolved file locations
    List,
    /// Print where the config and session data live
    Path,
    /// Reset config to defaults (session data is kept)
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let mut json = serde_json::to_value(&config)?;
            if let Some(map) = json.as_object_mut() {
                map.insert(
                    "config_file".into(),
                    Config::path()?.display().to_string().into(),
                );
                map.insert(
                    "data_file".into(),
                    config.data_file()?.display().to_string().into(),
                );
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        ConfigAction::Path => {
            let config = Config::load()?;
            println!("config: {}", Config::path()?.display());
            println!("data:   {}", config.data_file()?.display());
        }
        ConfigAction::Reset => {
            let config = Config::default();
            config.save()?;
            println!("config reset to defaults ({})", Config::path()?.display());
        }
    }
    Ok(())
}
