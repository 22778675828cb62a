//! # focusgrid Core Library
//!
//! Core logic for the focusgrid Pomodoro timer: the focus/break phase clock,
//! the per-day session log and the calendar heatmap projection. Everything
//! here is synchronous and driven from the outside; the CLI binary is one
//! driver, any GUI would be another.
//!
//! ## Architecture
//!
//! - **Phase Clock**: an anchor-based state machine over monotonic instants.
//!   The caller invokes `advance()` periodically; remaining time is
//!   recomputed from the anchor, never accumulated per tick
//! - **Session Log**: per-day focus-session counts persisted as a single
//!   JSON document
//! - **Heatmap**: pure projection of the log into a weekday × week grid
//! - **Timer Session**: the driver-owned object wiring clock, log, sinks and
//!   the auto-advance policy
//!
//! ## Key Components
//!
//! - [`PhaseClock`]: Core timer state machine
//! - [`SessionLog`]: Daily aggregates and their persistence
//! - [`HeatmapProjector`]: Grid projection for visualization
//! - [`TimerSession`]: What a tick loop calls into
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod heatmap;
pub mod notify;
pub mod session;
pub mod session_log;
pub mod storage;
pub mod timer;

pub use clock::{FixedToday, LocalToday, ManualClock, Monotonic, SystemClock, TimeSource, TodayProvider};
pub use error::{ConfigError, CoreError};
pub use events::Event;
pub use heatmap::{HeatmapGrid, HeatmapProjector, MAX_WINDOW_DAYS, WEEKDAY_LABELS};
pub use notify::{NoopSink, Notification, PhaseSink, RecordingSink};
pub use session::{AutoAdvance, Tick, TimerSession};
pub use session_log::{DayRange, DayRecord, SessionLog, Stats};
pub use storage::{Config, JsonFileStore, MemoryStore, SessionDocument, SessionStore};
pub use timer::{Advance, Mode, ModeSet, Phase, PhaseClock, PhaseCompletion, TimerState};
