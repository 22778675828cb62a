use chrono::{Local, NaiveDate};
use clap::Args;
use focusgrid_core::{Config, HeatmapGrid, HeatmapProjector, MAX_WINDOW_DAYS};

use super::open_log;

#[derive(Args)]
pub struct HeatmapArgs {
    /// Number of days to show, ending today (default from config)
    #[arg(long)]
    days: Option<u32>,
    /// Print the grid as JSON instead of drawing it
    #[arg(long)]
    json: bool,
    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

pub fn run(args: HeatmapArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let log = open_log(&config)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let days = args.days.unwrap_or(config.heatmap_days);
    if days == 0 || days > MAX_WINDOW_DAYS {
        return Err(format!("--days must be between 1 and {MAX_WINDOW_DAYS}").into());
    }

    let grid = HeatmapProjector::new(days).project(&log, today);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
    } else {
        print!("{}", render(&grid, days));
    }
    Ok(())
}

fn heat_char(count: u64) -> char {
    match count {
        0 => '·',
        1 => '░',
        2..=3 => '▒',
        4..=5 => '▓',
        _ => '█',
    }
}

/// Draw the grid one weekday per line. Cells outside the window are blank.
fn render(grid: &HeatmapGrid, days: u32) -> String {
    let mut out = format!("Focus sessions / day (last {days} days)\n");
    for (row, label) in grid.labels().iter().enumerate() {
        out.push_str(label);
        for col in 0..grid.columns() {
            out.push(' ');
            match grid.cell(row, col) {
                Some(count) if grid.in_window(row, col) => out.push(heat_char(count)),
                _ => out.push(' '),
            }
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} to {}: {} sessions, busiest day {}\n",
        grid.start(),
        grid.end(),
        grid.total(),
        grid.max_count()
    ));
    out
}
