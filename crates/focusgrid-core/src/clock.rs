//! Clock abstractions.
//!
//! The phase clock never reads the system clock itself. A [`TimeSource`]
//! supplies monotonic instants and a [`TodayProvider`] supplies the calendar
//! date used to key session records; both are injected so tests can drive
//! time by hand.

use std::cell::Cell;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A reading from a monotonic clock, stored as the offset from the clock's
/// origin. Only differences between two readings of the same source carry
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Monotonic(Duration);

impl Monotonic {
    pub const ZERO: Monotonic = Monotonic(Duration::ZERO);

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn offset(self) -> Duration {
        self.0
    }

    /// Time elapsed since `earlier`. Zero if `earlier` is in the future.
    pub fn saturating_since(self, earlier: Monotonic) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<Duration> for Monotonic {
    type Output = Monotonic;

    fn add(self, rhs: Duration) -> Monotonic {
        Monotonic(self.0.saturating_add(rhs))
    }
}

/// Source of monotonic instants. Readings must never decrease.
pub trait TimeSource {
    fn now(&self) -> Monotonic;
}

/// Monotonic time backed by [`std::time::Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Monotonic {
        Monotonic(self.origin.elapsed())
    }
}

/// Hand-driven clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get().saturating_add(by));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    /// Jump to an absolute offset. Ignored if it would move the clock back.
    pub fn set(&self, at: Monotonic) {
        if at.0 > self.now.get() {
            self.now.set(at.0);
        }
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Monotonic {
        Monotonic(self.now.get())
    }
}

impl<T: TimeSource + ?Sized> TimeSource for std::rc::Rc<T> {
    fn now(&self) -> Monotonic {
        (**self).now()
    }
}

/// Supplies the current calendar date.
pub trait TodayProvider {
    fn today(&self) -> NaiveDate;
}

/// Today's date in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalToday;

impl TodayProvider for LocalToday {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A date that never changes.
#[derive(Debug, Clone, Copy)]
pub struct FixedToday(pub NaiveDate);

impl TodayProvider for FixedToday {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
