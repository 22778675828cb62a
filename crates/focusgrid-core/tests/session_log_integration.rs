//! Integration tests for the session log and heatmap.
//!
//! This test file verifies:
//! - Aggregation of repeated focus sessions per day
//! - Zero defaults for untouched dates
//! - Persistence to a JSON document and graceful degradation
//! - Heatmap projection shape and determinism

use std::rc::Rc;

use chrono::NaiveDate;
use focusgrid_core::{
    AutoAdvance, FixedToday, HeatmapProjector, JsonFileStore, ManualClock, MemoryStore, Mode,
    SessionLog, Tick, TimerSession,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_scenario_c_two_sessions_same_day() {
    let mut log = SessionLog::in_memory();
    log.record_focus_session(date("2024-01-01"), 25).unwrap();
    log.record_focus_session(date("2024-01-01"), 25).unwrap();

    let day = log.day(date("2024-01-01"));
    assert_eq!(day.focus_sessions, 2);
    assert_eq!(day.minutes, 50);
}

#[test]
fn test_scenario_d_empty_log_heatmap() {
    let log = SessionLog::in_memory();
    let grid = HeatmapProjector::new(90).project(&log, date("2024-03-31"));

    assert_eq!(grid.rows().len(), 7);
    assert!(grid.columns() >= 13);
    assert!(grid.rows().iter().flatten().all(|&c| c == 0));
    assert_eq!(grid.labels()[0], "Mon");
    assert_eq!(grid.labels()[6], "Sun");
}

#[test]
fn test_heatmap_projection_is_repeatable() {
    let mut log = SessionLog::in_memory();
    for (d, n) in [("2024-03-01", 3), ("2024-03-15", 1), ("2024-03-30", 5)] {
        for _ in 0..n {
            log.record_focus_session(date(d), 25).unwrap();
        }
    }
    let projector = HeatmapProjector::default();
    let first = projector.project(&log, date("2024-03-31"));
    let second = projector.project(&log, date("2024-03-31"));
    assert_eq!(first, second);
    assert_eq!(first.total(), 9);
    assert_eq!(first.max_count(), 5);
}

#[test]
fn test_file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");

    {
        let mut log = SessionLog::open(JsonFileStore::new(&path));
        log.record_focus_session(date("2024-01-01"), 25).unwrap();
        log.record_focus_session(date("2024-01-02"), 50).unwrap();
    }

    let log = SessionLog::open(JsonFileStore::new(&path));
    assert_eq!(log.day(date("2024-01-01")).minutes, 25);
    assert_eq!(log.day(date("2024-01-02")).minutes, 50);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["days"]["2024-01-02"]["focus_sessions"], 1);
}

#[test]
fn test_corrupt_file_degrades_then_recovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(&path, "not json at all").unwrap();

    let mut log = SessionLog::open(JsonFileStore::new(&path));
    assert_eq!(log.day(date("2024-01-01")).focus_sessions, 0);

    log.record_focus_session(date("2024-01-01"), 25).unwrap();
    let reopened = SessionLog::open(JsonFileStore::new(&path));
    assert_eq!(reopened.day(date("2024-01-01")).focus_sessions, 1);
}

#[test]
fn test_settings_and_unknown_keys_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    std::fs::write(
        &path,
        r#"{"days": {}, "settings": {"playlist_url": "https://example.com/p", "volume": 0.6}, "schema": 1}"#,
    )
    .unwrap();

    let mut log = SessionLog::open(JsonFileStore::new(&path));
    log.record_focus_session(date("2024-01-01"), 25).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["settings"]["playlist_url"], "https://example.com/p");
    assert_eq!(json["settings"]["volume"], 0.6);
    assert_eq!(json["schema"], 1);
}

#[test]
fn test_session_driver_writes_through_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.json");
    let clock = Rc::new(ManualClock::new());

    let mut session = TimerSession::new(Mode::classic(), SessionLog::open(JsonFileStore::new(&path)))
        .with_time_source(Rc::clone(&clock))
        .with_today(FixedToday(date("2024-05-06")))
        .with_auto_advance(AutoAdvance::off());

    session.start();
    clock.advance_secs(1500);
    assert!(matches!(session.tick(), Tick::Completed { .. }));

    let reopened = SessionLog::open(JsonFileStore::new(&path));
    assert_eq!(reopened.day(date("2024-05-06")).minutes, 25);
}

#[test]
fn test_unavailable_store_never_stops_the_timer() {
    let store = Rc::new(MemoryStore::new());
    store.set_failing(true);
    let clock = Rc::new(ManualClock::new());
    let mut session = TimerSession::new(Mode::classic(), SessionLog::open(Rc::clone(&store)))
        .with_time_source(Rc::clone(&clock))
        .with_today(FixedToday(date("2024-05-06")))
        .with_auto_advance(AutoAdvance::off());

    session.start();
    clock.advance_secs(1500);
    assert!(matches!(
        session.tick(),
        Tick::Completed { recorded: Some(_), .. }
    ));
    assert_eq!(session.log().day(date("2024-05-06")).focus_sessions, 1);
    assert_eq!(store.save_count(), 0);
}

proptest! {
    #[test]
    fn prop_aggregation_is_monotone(n in 0u64..40, minutes in 1u32..180) {
        let mut log = SessionLog::in_memory();
        let d = date("2024-02-29");
        for _ in 0..n {
            log.record_focus_session(d, minutes).unwrap();
        }
        let day = log.day(d);
        prop_assert_eq!(day.focus_sessions, n);
        prop_assert_eq!(day.minutes, n * u64::from(minutes));
    }

    #[test]
    fn prop_unrecorded_days_read_zero(offset in 0u64..3650) {
        let log = SessionLog::in_memory();
        let d = date("2020-01-01") + chrono::Days::new(offset);
        let day = log.day(d);
        prop_assert_eq!(day.focus_sessions, 0);
        prop_assert_eq!(day.minutes, 0);
        prop_assert!(log.document().days.is_empty());
    }

    #[test]
    fn prop_heatmap_always_has_seven_rows(window in 1u32..400, offset in 0u64..3650) {
        let log = SessionLog::in_memory();
        let today = date("2020-01-01") + chrono::Days::new(offset);
        let grid = HeatmapProjector::new(window).project(&log, today);
        prop_assert_eq!(grid.rows().len(), 7);
        prop_assert!(grid.rows().iter().all(|r| r.len() == grid.columns()));
        prop_assert!(grid.in_window(
            today.format("%u").to_string().parse::<usize>().unwrap() - 1,
            grid.columns() - 1
        ));
    }
}
