use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every state change of the phase clock produces an Event.
/// Drivers print them, sinks and tests inspect them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerReset {
        remaining_secs: u64,
    },
    ModeChanged {
        mode: String,
        /// False when the clock was running and kept its current countdown.
        resized: bool,
        remaining_secs: u64,
    },
    PhaseCompleted {
        completed_phase: Phase,
        next_phase: Phase,
        /// Length of the completed phase, only set for focus phases.
        focus_minutes: Option<u32>,
        next_duration_minutes: u32,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        mode: String,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
    },
}
