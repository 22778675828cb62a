pub mod config;
pub mod heatmap;
pub mod modes;
pub mod playlist;
pub mod record;
pub mod run;
pub mod stats;

use focusgrid_core::{Config, JsonFileStore, SessionLog};

/// Open the session log at the configured data file.
pub fn open_log(config: &Config) -> Result<SessionLog, Box<dyn std::error::Error>> {
    let path = config.data_file()?;
    tracing::debug!(path = %path.display(), "opening session data");
    Ok(SessionLog::open(JsonFileStore::new(path)))
}

/// `MM:SS`, minutes unbounded.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_clock_pads() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(6000), "100:00");
    }
}
