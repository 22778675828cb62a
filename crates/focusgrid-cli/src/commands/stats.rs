use chrono::{Local, NaiveDate};
use clap::Subcommand;
use focusgrid_core::{Config, DayRecord};

use super::open_log;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats
    All,
    /// A single day
    Day {
        /// Date (YYYY-MM-DD)
        date: NaiveDate,
    },
    /// Every day from START through END, inclusive
    Range {
        /// First date (YYYY-MM-DD)
        start: NaiveDate,
        /// Last date (YYYY-MM-DD)
        end: NaiveDate,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let log = open_log(&config)?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Today => {
            let stats = log.summary(today);
            let json = serde_json::json!({
                "date": today,
                "focus_sessions": stats.today_sessions,
                "minutes": stats.today_minutes,
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        StatsAction::All => {
            let stats = log.summary(today);
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Day { date } => {
            println!("{}", serde_json::to_string_pretty(&log.day(date))?);
        }
        StatsAction::Range { start, end } => {
            if end < start {
                return Err(format!("range end {end} is before start {start}").into());
            }
            let days: Vec<DayRecord> = log.range(start, end).collect();
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
    }
    Ok(())
}
