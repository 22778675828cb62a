use clap::Subcommand;
use focusgrid_core::{Config, SessionLog};
use serde_json::Value;

use super::open_log;

const PLAYLIST_KEY: &str = "playlist_url";

#[derive(Subcommand)]
pub enum PlaylistAction {
    /// Print the saved playlist URL
    Show,
    /// Save a playlist URL
    Set {
        /// URL to open during focus sessions
        url: String,
    },
    /// Open the saved playlist in the default browser
    Open,
}

fn saved_url(log: &SessionLog) -> Option<&str> {
    log.setting(PLAYLIST_KEY)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|url| !url.is_empty())
}

pub fn run(action: PlaylistAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut log = open_log(&config)?;

    match action {
        PlaylistAction::Show => match saved_url(&log) {
            Some(url) => println!("{url}"),
            None => println!("No playlist URL set."),
        },
        PlaylistAction::Set { url } => {
            log.set_setting(PLAYLIST_KEY, Value::String(url.trim().to_string()));
            println!("Saved playlist URL.");
        }
        PlaylistAction::Open => {
            let url = saved_url(&log).ok_or("no playlist URL set; use `playlist set URL`")?;
            tracing::debug!(url, "opening playlist");
            open::that(url)?;
        }
    }
    Ok(())
}
