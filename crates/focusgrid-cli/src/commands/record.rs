use chrono::{Local, NaiveDate};
use clap::Args;
use focusgrid_core::Config;

use super::open_log;

#[derive(Args)]
pub struct LogArgs {
    /// Length of the focus session in minutes
    minutes: u32,
    /// Date to record against (YYYY-MM-DD, default today)
    #[arg(long)]
    date: Option<NaiveDate>,
}

pub fn run(args: LogArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut log = open_log(&config)?;
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());

    let record = log.record_focus_session(date, args.minutes)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
