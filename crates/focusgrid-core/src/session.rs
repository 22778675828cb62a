//! Driver-side owner of a running timer.
//!
//! A [`TimerSession`] is built once by whatever drives the timer (the CLI
//! loop, a GUI event callback) and handed around by `&mut`. It ties the
//! [`PhaseClock`] to its clock source, logs completed focus phases, notifies
//! the sink and applies the auto-advance policy. Nothing here blocks except
//! the session log's write after a focus phase.

use std::time::Duration;

use chrono::NaiveDate;

use crate::clock::{LocalToday, Monotonic, SystemClock, TimeSource, TodayProvider};
use crate::events::Event;
use crate::heatmap::{HeatmapGrid, HeatmapProjector};
use crate::notify::{NoopSink, Notification, PhaseSink};
use crate::session_log::{DayRecord, SessionLog};
use crate::timer::{Advance, Mode, Phase, PhaseClock, PhaseCompletion};

/// Whether the next phase starts by itself after a completion, and after
/// how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvance {
    pub enabled: bool,
    pub delay: Duration,
}

impl AutoAdvance {
    pub fn off() -> Self {
        Self {
            enabled: false,
            delay: Duration::ZERO,
        }
    }
}

impl Default for AutoAdvance {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: Duration::from_millis(500),
        }
    }
}

/// Result of one [`TimerSession::tick`].
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Clock is stopped (or waiting out the auto-advance delay).
    Idle,
    /// Counting down.
    Remaining(u64),
    /// A phase just ended. `recorded` holds the updated day for focus phases.
    Completed {
        completion: PhaseCompletion,
        recorded: Option<DayRecord>,
    },
    /// The next phase was started by auto-advance.
    Restarted(Event),
}

pub struct TimerSession {
    clock: PhaseClock,
    log: SessionLog,
    time: Box<dyn TimeSource>,
    today: Box<dyn TodayProvider>,
    sink: Box<dyn PhaseSink>,
    auto_advance: AutoAdvance,
    restart_at: Option<Monotonic>,
    completed_focus: u64,
}

impl TimerSession {
    /// A session on the system clock and local date, with no notifications
    /// and the default auto-advance policy.
    pub fn new(mode: Mode, log: SessionLog) -> Self {
        Self {
            clock: PhaseClock::new(mode),
            log,
            time: Box::new(SystemClock::new()),
            today: Box::new(LocalToday),
            sink: Box::new(NoopSink),
            auto_advance: AutoAdvance::default(),
            restart_at: None,
            completed_focus: 0,
        }
    }

    pub fn with_time_source(mut self, time: impl TimeSource + 'static) -> Self {
        self.time = Box::new(time);
        self
    }

    pub fn with_today(mut self, today: impl TodayProvider + 'static) -> Self {
        self.today = Box::new(today);
        self
    }

    pub fn with_sink(mut self, sink: impl PhaseSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_auto_advance(mut self, policy: AutoAdvance) -> Self {
        self.auto_advance = policy;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    pub fn log(&self) -> &SessionLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut SessionLog {
        &mut self.log
    }

    pub fn phase(&self) -> Phase {
        self.clock.phase()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.clock.remaining_at(self.time.now())
    }

    pub fn restart_pending(&self) -> bool {
        self.restart_at.is_some()
    }

    /// Focus phases completed since this session was created.
    pub fn completed_focus_sessions(&self) -> u64 {
        self.completed_focus
    }

    pub fn today(&self) -> NaiveDate {
        self.today.today()
    }

    pub fn snapshot(&self) -> Event {
        self.clock.snapshot(self.time.now())
    }

    pub fn heatmap(&self, projector: &HeatmapProjector) -> HeatmapGrid {
        projector.project(&self.log, self.today.today())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.restart_at = None;
        self.clock.start(self.time.now())
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.restart_at = None;
        self.clock.pause(self.time.now())
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.restart_at = None;
        self.clock.reset()
    }

    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        self.clock.change_mode(mode)
    }

    /// Call periodically.
    pub fn tick(&mut self) -> Tick {
        let now = self.time.now();

        if let Some(at) = self.restart_at {
            if now < at {
                return Tick::Idle;
            }
            self.restart_at = None;
            if let Some(event) = self.clock.start(now) {
                tracing::debug!(phase = %self.clock.phase(), "auto-advanced to next phase");
                return Tick::Restarted(event);
            }
        }

        match self.clock.advance(now) {
            Advance::Idle => Tick::Idle,
            Advance::Remaining(secs) => Tick::Remaining(secs),
            Advance::Completed(completion) => self.complete(completion, now),
        }
    }

    fn complete(&mut self, completion: PhaseCompletion, now: Monotonic) -> Tick {
        tracing::info!(
            completed = %completion.completed_phase,
            next = %completion.next_phase,
            "phase completed"
        );

        let recorded = match completion.focus_minutes {
            Some(minutes) => {
                self.completed_focus += 1;
                let date = self.today.today();
                match self.log.record_focus_session(date, minutes) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::error!(error = %e, "focus session not recorded");
                        None
                    }
                }
            }
            None => None,
        };

        self.sink
            .phase_completed(&Notification::for_completion(&completion));

        if self.auto_advance.enabled {
            self.restart_at = Some(now + self.auto_advance.delay);
        }

        Tick::Completed {
            completion,
            recorded,
        }
    }
}
