//! Per-day aggregate of completed focus sessions.
//!
//! The log keeps the whole [`SessionDocument`] in memory and writes it back
//! through its [`SessionStore`] after every mutation. Persistence is best
//! effort: a failed load starts from an empty log and a failed save keeps the
//! in-memory update.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};
use crate::storage::{DayTotals, SessionDocument, SessionStore};

/// Sessions logged on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub focus_sessions: u64,
    pub minutes: u64,
}

impl DayRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            focus_sessions: 0,
            minutes: 0,
        }
    }

    fn from_totals(date: NaiveDate, totals: &DayTotals) -> Self {
        Self {
            date,
            focus_sessions: totals.focus_sessions,
            minutes: totals.minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Stats {
    pub today_sessions: u64,
    pub today_minutes: u64,
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub active_days: u64,
}

pub(crate) fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub struct SessionLog {
    doc: SessionDocument,
    store: Option<Box<dyn SessionStore>>,
}

impl std::fmt::Debug for SessionLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLog")
            .field("days", &self.doc.days.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}

impl SessionLog {
    /// A log with no backing store.
    pub fn in_memory() -> Self {
        Self {
            doc: SessionDocument::default(),
            store: None,
        }
    }

    /// Load the log from `store`. An unreadable store yields an empty log;
    /// later mutations will still try to write to it.
    pub fn open(store: impl SessionStore + 'static) -> Self {
        let doc = match store.load() {
            Ok(doc) => {
                tracing::debug!(days = doc.days.len(), "session data loaded");
                doc
            }
            Err(e) => {
                tracing::warn!(error = %e, "session data unavailable; starting with an empty log");
                SessionDocument::default()
            }
        };
        Self {
            doc,
            store: Some(Box::new(store)),
        }
    }

    pub fn document(&self) -> &SessionDocument {
        &self.doc
    }

    /// Count one completed focus session of `minutes` on `date`.
    ///
    /// Must be called once per completed focus phase; repeated calls are
    /// counted again.
    ///
    /// # Errors
    /// Returns `InvalidArgument` if `minutes` is zero. Nothing is recorded.
    pub fn record_focus_session(&mut self, date: NaiveDate, minutes: u32) -> Result<DayRecord> {
        if minutes == 0 {
            return Err(CoreError::invalid_argument(
                "minutes",
                "must be greater than zero",
            ));
        }
        let totals = self.doc.days.entry(day_key(date)).or_default();
        totals.focus_sessions = totals.focus_sessions.saturating_add(1);
        totals.minutes = totals.minutes.saturating_add(u64::from(minutes));
        let record = DayRecord::from_totals(date, totals);

        tracing::info!(
            %date,
            minutes,
            focus_sessions = record.focus_sessions,
            "focus session recorded"
        );
        self.persist();
        Ok(record)
    }

    /// Totals for `date`, zero if nothing was recorded.
    pub fn day(&self, date: NaiveDate) -> DayRecord {
        self.doc
            .days
            .get(&day_key(date))
            .map(|totals| DayRecord::from_totals(date, totals))
            .unwrap_or_else(|| DayRecord::empty(date))
    }

    /// Every date from `start` to `end` inclusive, in order. Dates without
    /// sessions yield zero records. Empty if `start > end`.
    pub fn range(&self, start: NaiveDate, end: NaiveDate) -> DayRange<'_> {
        DayRange {
            days: &self.doc.days,
            next: (start <= end).then_some(start),
            end,
        }
    }

    /// Dates with at least one recorded entry, oldest first. Malformed keys
    /// are skipped.
    pub fn recorded_days(&self) -> impl Iterator<Item = DayRecord> + '_ {
        self.doc.days.iter().filter_map(|(key, totals)| {
            NaiveDate::parse_from_str(key, "%Y-%m-%d")
                .ok()
                .map(|date| DayRecord::from_totals(date, totals))
        })
    }

    pub fn summary(&self, today: NaiveDate) -> Stats {
        let mut stats = Stats::default();
        for record in self.recorded_days() {
            stats.total_sessions = stats.total_sessions.saturating_add(record.focus_sessions);
            stats.total_minutes = stats.total_minutes.saturating_add(record.minutes);
            if record.focus_sessions > 0 {
                stats.active_days += 1;
            }
            if record.date == today {
                stats.today_sessions = record.focus_sessions;
                stats.today_minutes = record.minutes;
            }
        }
        stats
    }

    /// Read one key of the opaque settings object.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.doc.settings.get(key)
    }

    /// Write one key of the settings object and persist.
    pub fn set_setting(&mut self, key: &str, value: Value) {
        self.doc.settings.insert(key.to_string(), value);
        self.persist();
    }

    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.save(&self.doc) {
            tracing::warn!(error = %e, "failed to save session data; keeping in-memory state");
        }
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Lazy walk over a date range. Clone it to walk the range again.
#[derive(Debug, Clone)]
pub struct DayRange<'a> {
    days: &'a BTreeMap<String, DayTotals>,
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayRange<'_> {
    type Item = DayRecord;

    fn next(&mut self) -> Option<DayRecord> {
        let date = self.next?;
        self.next = if date < self.end { date.succ_opt() } else { None };
        Some(
            self.days
                .get(&day_key(date))
                .map(|totals| DayRecord::from_totals(date, totals))
                .unwrap_or_else(|| DayRecord::empty(date)),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self
            .next
            .map(|d| (self.end - d).num_days() as usize + 1)
            .unwrap_or(0);
        (len, Some(len))
    }
}

impl ExactSizeIterator for DayRange<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn record_twice_accumulates() {
        let mut log = SessionLog::in_memory();
        log.record_focus_session(date("2024-01-01"), 25).unwrap();
        let rec = log.record_focus_session(date("2024-01-01"), 25).unwrap();
        assert_eq!(rec.focus_sessions, 2);
        assert_eq!(rec.minutes, 50);
        assert_eq!(log.day(date("2024-01-01")), rec);
    }

    #[test]
    fn zero_minutes_is_rejected_without_mutation() {
        let mut log = SessionLog::in_memory();
        let err = log.record_focus_session(date("2024-01-01"), 0).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument { .. }));
        assert!(log.document().days.is_empty());
    }

    #[test]
    fn missing_day_reads_zero_and_does_not_insert() {
        let log = SessionLog::in_memory();
        for _ in 0..3 {
            assert_eq!(
                log.day(date("2030-06-15")),
                DayRecord::empty(date("2030-06-15"))
            );
        }
        assert!(log.document().days.is_empty());
    }

    #[test]
    fn range_fills_gaps_and_is_restartable() {
        let mut log = SessionLog::in_memory();
        log.record_focus_session(date("2024-02-28"), 50).unwrap();
        log.record_focus_session(date("2024-03-01"), 25).unwrap();

        let range = log.range(date("2024-02-27"), date("2024-03-02"));
        assert_eq!(range.len(), 5);
        let first: Vec<_> = range.clone().collect();
        let second: Vec<_> = range.collect();
        assert_eq!(first, second);

        let counts: Vec<u64> = first.iter().map(|r| r.focus_sessions).collect();
        assert_eq!(counts, vec![0, 1, 0, 1, 0]);
        assert_eq!(first[2].date, date("2024-02-29"));
    }

    #[test]
    fn reversed_range_is_empty() {
        let log = SessionLog::in_memory();
        assert_eq!(log.range(date("2024-01-02"), date("2024-01-01")).count(), 0);
        assert_eq!(log.range(date("2024-01-01"), date("2024-01-01")).count(), 1);
    }

    #[test]
    fn every_record_is_persisted() {
        let store = Rc::new(MemoryStore::new());
        let mut log = SessionLog::open(Rc::clone(&store));
        log.record_focus_session(date("2024-01-01"), 25).unwrap();
        log.record_focus_session(date("2024-01-02"), 25).unwrap();
        assert_eq!(store.save_count(), 2);
        let saved = store.document().unwrap();
        assert_eq!(saved.days["2024-01-02"].minutes, 25);
    }

    #[test]
    fn failed_save_keeps_memory_state() {
        let store = Rc::new(MemoryStore::new());
        let mut log = SessionLog::open(Rc::clone(&store));
        store.set_failing(true);
        let rec = log.record_focus_session(date("2024-01-01"), 25).unwrap();
        assert_eq!(rec.focus_sessions, 1);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn failed_load_degrades_to_empty() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let log = SessionLog::open(store);
        assert!(log.document().days.is_empty());
    }

    #[test]
    fn summary_counts_today_and_totals() {
        let mut log = SessionLog::in_memory();
        log.record_focus_session(date("2024-01-01"), 25).unwrap();
        log.record_focus_session(date("2024-01-03"), 50).unwrap();
        log.record_focus_session(date("2024-01-03"), 50).unwrap();
        let stats = log.summary(date("2024-01-03"));
        assert_eq!(
            stats,
            Stats {
                today_sessions: 2,
                today_minutes: 100,
                total_sessions: 3,
                total_minutes: 125,
                active_days: 2,
            }
        );
    }

    #[test]
    fn summary_saturates_on_huge_stored_counts() {
        let mut doc = SessionDocument::default();
        doc.days.insert(
            "2024-01-01".into(),
            DayTotals {
                focus_sessions: u64::MAX,
                minutes: u64::MAX,
            },
        );
        doc.days.insert(
            "2024-01-02".into(),
            DayTotals {
                focus_sessions: 1,
                minutes: 25,
            },
        );
        let log = SessionLog::open(MemoryStore::with_document(doc));

        let stats = log.summary(date("2024-01-02"));
        assert_eq!(stats.total_sessions, u64::MAX);
        assert_eq!(stats.total_minutes, u64::MAX);
        assert_eq!(stats.active_days, 2);
        assert_eq!(stats.today_sessions, 1);
    }

    #[test]
    fn malformed_keys_are_ignored_but_kept() {
        let mut doc = SessionDocument::default();
        doc.days.insert("yesterday".into(), DayTotals::default());
        let store = Rc::new(MemoryStore::with_document(doc));
        let mut log = SessionLog::open(Rc::clone(&store));
        assert_eq!(log.recorded_days().count(), 0);
        log.record_focus_session(date("2024-01-01"), 25).unwrap();
        assert!(store.document().unwrap().days.contains_key("yesterday"));
    }

    #[test]
    fn settings_round_trip_through_store() {
        let store = Rc::new(MemoryStore::new());
        let mut log = SessionLog::open(Rc::clone(&store));
        log.set_setting("playlist_url", Value::from("https://example.com"));
        let reopened = SessionLog::open(Rc::clone(&store));
        assert_eq!(
            reopened.setting("playlist_url"),
            Some(&Value::from("https://example.com"))
        );
    }
}
