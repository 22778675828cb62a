//! Calendar heatmap projection.
//!
//! Turns the session log into a weekday × week grid of focus-session counts
//! for the trailing window ending today. Rows are fixed Monday-first; the
//! first column starts at the Monday on or before the first day of the
//! window. Cells outside the window (padding in the first and last week)
//! stay zero.
//!
//! The projection is pure: the same log contents and the same `today`
//! always produce the same grid.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::session_log::SessionLog;

pub const DEFAULT_WINDOW_DAYS: u32 = 90;

/// Largest accepted window, roughly ten years.
pub const MAX_WINDOW_DAYS: u32 = 3660;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapProjector {
    window_days: u32,
}

impl HeatmapProjector {
    /// A projector over the trailing `window_days` days, clamped to
    /// `1..=MAX_WINDOW_DAYS`.
    pub fn new(window_days: u32) -> Self {
        Self {
            window_days: window_days.clamp(1, MAX_WINDOW_DAYS),
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Columns are whole weeks from `first_monday` to `today` (floor
    /// division plus one), so the last column always holds `today`.
    pub fn project(&self, log: &SessionLog, today: NaiveDate) -> HeatmapGrid {
        let start = today
            .checked_sub_days(Days::new(u64::from(self.window_days - 1)))
            .unwrap_or(NaiveDate::MIN);
        let first_monday = start
            .checked_sub_days(Days::new(u64::from(
                start.weekday().num_days_from_monday(),
            )))
            .unwrap_or(start);
        let columns = ((today - first_monday).num_days() / 7 + 1) as usize;

        let mut rows = vec![vec![0u64; columns]; 7];
        for record in log.range(start, today) {
            let row = record.date.weekday().num_days_from_monday() as usize;
            let col = ((record.date - first_monday).num_days() / 7) as usize;
            rows[row][col] = record.focus_sessions;
        }

        HeatmapGrid {
            labels: WEEKDAY_LABELS,
            start,
            end: today,
            first_monday,
            rows,
        }
    }
}

impl Default for HeatmapProjector {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

/// 7 × N grid of daily focus-session counts, Monday in row 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapGrid {
    labels: [&'static str; 7],
    start: NaiveDate,
    end: NaiveDate,
    first_monday: NaiveDate,
    rows: Vec<Vec<u64>>,
}

impl HeatmapGrid {
    pub fn labels(&self) -> &[&'static str; 7] {
        &self.labels
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.rows
    }

    pub fn columns(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<u64> {
        self.rows.get(row)?.get(col).copied()
    }

    /// First day of the window.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the window ("today").
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn first_monday(&self) -> NaiveDate {
        self.first_monday
    }

    /// Calendar date a cell stands for.
    pub fn date_at(&self, row: usize, col: usize) -> Option<NaiveDate> {
        if row >= 7 || col >= self.columns() {
            return None;
        }
        self.first_monday
            .checked_add_days(Days::new((col * 7 + row) as u64))
    }

    /// Whether the cell's date lies inside the window.
    pub fn in_window(&self, row: usize, col: usize) -> bool {
        self.date_at(row, col)
            .is_some_and(|d| d >= self.start && d <= self.end)
    }

    pub fn max_count(&self) -> u64 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().flatten().sum()
    }
}
