//! Phase clock implementation.
//!
//! The phase clock is an anchor-based state machine. It owns no thread and
//! never reads a clock: every command that depends on time takes `now` from
//! the caller's [`TimeSource`](crate::clock::TimeSource).
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Idle
//!                    |
//!                 advance (remaining hits 0)
//!                    v
//!          Idle, next phase loaded
//! ```
//!
//! While running, the remaining time is always recomputed from the anchor
//! instant instead of being decremented per tick, so tick cadence and
//! redraw jitter never change the result.

use serde::{Deserialize, Serialize};

use super::mode::{Mode, Phase};
use crate::clock::Monotonic;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
}

/// Emitted by [`PhaseClock::advance`] when the running phase reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    pub completed_phase: Phase,
    pub next_phase: Phase,
    /// Minutes of the focus phase that just ended; `None` for breaks.
    pub focus_minutes: Option<u32>,
    pub next_duration_minutes: u32,
}

impl PhaseCompletion {
    pub fn to_event(&self) -> Event {
        Event::PhaseCompleted {
            completed_phase: self.completed_phase,
            next_phase: self.next_phase,
            focus_minutes: self.focus_minutes,
            next_duration_minutes: self.next_duration_minutes,
        }
    }
}

/// Outcome of a single [`PhaseClock::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Clock is not running; nothing happened.
    Idle,
    /// Still counting down; carries the effective remaining seconds.
    Remaining(u64),
    /// The phase ended. The clock has already flipped and stopped.
    Completed(PhaseCompletion),
}

/// Focus/break state machine.
#[derive(Debug, Clone)]
pub struct PhaseClock {
    mode: Mode,
    phase: Phase,
    /// Authoritative when idle; value at the anchor instant when running.
    remaining_secs: u64,
    /// Minutes the current countdown was loaded with.
    phase_minutes: u32,
    anchor: Option<Monotonic>,
}

impl PhaseClock {
    /// Create an idle clock in the focus phase with the mode's focus duration.
    pub fn new(mode: Mode) -> Self {
        let phase_minutes = mode.minutes(Phase::Focus);
        Self {
            remaining_secs: mode.duration_secs(Phase::Focus),
            phase_minutes,
            mode,
            phase: Phase::Focus,
            anchor: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        if self.anchor.is_some() {
            TimerState::Running
        } else {
            TimerState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.anchor.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn anchor(&self) -> Option<Monotonic> {
        self.anchor
    }

    /// Stored remaining seconds. While running this is the value at the
    /// anchor instant; use [`remaining_at`](Self::remaining_at) for display.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    /// Effective remaining seconds at `now`, rounded to the nearest second
    /// and clamped at zero. Does not mutate the clock.
    pub fn remaining_at(&self, now: Monotonic) -> u64 {
        match self.anchor {
            None => self.remaining_secs,
            Some(anchor) => {
                let elapsed_ms = now.saturating_since(anchor).as_millis();
                let total_ms = u128::from(self.remaining_secs) * 1000;
                if elapsed_ms >= total_ms {
                    0
                } else {
                    ((total_ms - elapsed_ms + 500) / 1000) as u64
                }
            }
        }
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.phase_minutes).saturating_mul(60)
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress_at(&self, now: Monotonic) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_at(now) as f64 / total as f64).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self, now: Monotonic) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            phase: self.phase,
            mode: self.mode.name().to_string(),
            remaining_secs: self.remaining_at(now),
            total_secs: self.total_secs(),
            progress: self.progress_at(now),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now: Monotonic) -> Option<Event> {
        if self.anchor.is_some() {
            return None;
        }
        self.anchor = Some(now);
        Some(Event::TimerStarted {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn pause(&mut self, now: Monotonic) -> Option<Event> {
        self.anchor?;
        self.remaining_secs = self.remaining_at(now);
        self.anchor = None;
        Some(Event::TimerPaused {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
        })
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.anchor = None;
        self.load_phase(Phase::Focus);
        Some(Event::TimerReset {
            remaining_secs: self.remaining_secs,
        })
    }

    /// Switch modes. An idle clock reloads the current phase with the new
    /// duration; a running countdown is left alone and the new mode applies
    /// from the next phase on.
    pub fn change_mode(&mut self, mode: Mode) -> Option<Event> {
        self.mode = mode;
        let resized = self.anchor.is_none();
        if resized {
            self.load_phase(self.phase);
        }
        Some(Event::ModeChanged {
            mode: self.mode.name().to_string(),
            resized,
            remaining_secs: self.remaining_secs,
        })
    }

    /// Call periodically while running.
    pub fn advance(&mut self, now: Monotonic) -> Advance {
        if self.anchor.is_none() {
            return Advance::Idle;
        }
        let left = self.remaining_at(now);
        if left > 0 {
            return Advance::Remaining(left);
        }

        let completed_phase = self.phase;
        let focus_minutes = (completed_phase == Phase::Focus).then_some(self.phase_minutes);
        let next_phase = completed_phase.next();
        self.anchor = None;
        self.load_phase(next_phase);

        Advance::Completed(PhaseCompletion {
            completed_phase,
            next_phase,
            focus_minutes,
            next_duration_minutes: self.phase_minutes,
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn load_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.phase_minutes = self.mode.minutes(phase);
        self.remaining_secs = self.mode.duration_secs(phase);
    }
}

impl Default for PhaseClock {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Monotonic {
        Monotonic::from_secs(s)
    }

    #[test]
    fn new_clock_is_idle_focus() {
        let mut clock = PhaseClock::new(Mode::classic());
        assert_eq!(clock.state(), TimerState::Idle);
        assert_eq!(clock.phase(), Phase::Focus);
        assert_eq!(clock.remaining_secs(), 1500);
        assert_eq!(clock.advance(Monotonic::ZERO), Advance::Idle);
    }

    #[test]
    fn start_twice_is_noop() {
        let mut clock = PhaseClock::default();
        assert!(clock.start(secs(0)).is_some());
        assert!(clock.start(secs(3)).is_none());
        assert_eq!(clock.anchor(), Some(secs(0)));
    }

    #[test]
    fn pause_is_idempotent() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        assert_eq!(
            clock.pause(secs(10)),
            Some(Event::TimerPaused {
                phase: Phase::Focus,
                remaining_secs: 1490
            })
        );
        assert!(clock.pause(secs(20)).is_none());
        assert_eq!(clock.remaining_secs(), 1490);
    }

    #[test]
    fn pause_rounds_to_nearest_second() {
        let mut clock = PhaseClock::default();
        clock.start(Monotonic::ZERO);
        clock.pause(Monotonic::from_millis(10_400));
        assert_eq!(clock.remaining_secs(), 1490);

        clock.start(Monotonic::from_millis(20_000));
        clock.pause(Monotonic::from_millis(20_600));
        assert_eq!(clock.remaining_secs(), 1489);
    }

    #[test]
    fn scenario_b_two_running_intervals() {
        let mut clock = PhaseClock::new(Mode::classic());
        clock.start(secs(0));
        clock.pause(secs(10));
        assert_eq!(clock.remaining_secs(), 1490);
        clock.start(secs(100));
        clock.pause(secs(105));
        assert_eq!(clock.remaining_secs(), 1485);
    }

    #[test]
    fn scenario_a_focus_completion() {
        let mut clock = PhaseClock::new(Mode::classic());
        clock.start(secs(0));
        assert_eq!(clock.advance(secs(0)), Advance::Remaining(1500));

        let outcome = clock.advance(secs(1500));
        assert_eq!(
            outcome,
            Advance::Completed(PhaseCompletion {
                completed_phase: Phase::Focus,
                next_phase: Phase::Break,
                focus_minutes: Some(25),
                next_duration_minutes: 5,
            })
        );
        assert_eq!(clock.phase(), Phase::Break);
        assert_eq!(clock.remaining_secs(), 300);
        assert_eq!(clock.state(), TimerState::Idle);
    }

    #[test]
    fn phases_alternate_across_completions() {
        let mut clock = PhaseClock::new(Mode::extended());
        clock.start(secs(0));
        let first = clock.advance(secs(3000));
        assert!(matches!(first, Advance::Completed(c) if c.next_phase == Phase::Break));
        assert_eq!(clock.remaining_secs(), 600);

        clock.start(secs(3001));
        let second = clock.advance(secs(3601));
        assert!(matches!(
            second,
            Advance::Completed(c) if c.completed_phase == Phase::Break && c.focus_minutes.is_none()
        ));
        assert_eq!(clock.phase(), Phase::Focus);
        assert_eq!(clock.remaining_secs(), 3000);
    }

    #[test]
    fn long_gap_completes_immediately() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        assert!(matches!(clock.advance(secs(86_400)), Advance::Completed(_)));
    }

    #[test]
    fn advance_while_idle_is_noop() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        clock.pause(secs(30));
        assert_eq!(clock.advance(secs(10_000)), Advance::Idle);
        assert_eq!(clock.remaining_secs(), 1470);
    }

    #[test]
    fn observation_does_not_mutate() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        for t in 1..50 {
            clock.advance(secs(t));
        }
        assert_eq!(clock.remaining_secs(), 1500);
        assert_eq!(clock.remaining_at(secs(50)), 1450);
    }

    #[test]
    fn reset_returns_to_focus() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        clock.advance(secs(1500));
        assert_eq!(clock.phase(), Phase::Break);
        clock.start(secs(1500));
        clock.reset();
        assert_eq!(clock.phase(), Phase::Focus);
        assert_eq!(clock.state(), TimerState::Idle);
        assert_eq!(clock.remaining_secs(), 1500);
    }

    #[test]
    fn change_mode_resizes_only_when_idle() {
        let mut clock = PhaseClock::new(Mode::classic());
        clock.change_mode(Mode::extended());
        assert_eq!(clock.remaining_secs(), 3000);

        clock.start(secs(0));
        let event = clock.change_mode(Mode::classic());
        assert!(matches!(event, Some(Event::ModeChanged { resized: false, .. })));
        assert_eq!(clock.remaining_at(secs(60)), 2940);

        // The running focus phase keeps its length; the break uses the new mode.
        let outcome = clock.advance(secs(3000));
        assert!(matches!(
            outcome,
            Advance::Completed(c) if c.focus_minutes == Some(50) && c.next_duration_minutes == 5
        ));
    }

    #[test]
    fn snapshot_reports_effective_remaining() {
        let mut clock = PhaseClock::default();
        clock.start(secs(0));
        match clock.snapshot(secs(300)) {
            Event::StateSnapshot {
                state,
                remaining_secs,
                total_secs,
                progress,
                ..
            } => {
                assert_eq!(state, TimerState::Running);
                assert_eq!(remaining_secs, 1200);
                assert_eq!(total_secs, 1500);
                assert!((progress - 0.2).abs() < 1e-9);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
