mod mode;
mod phase_clock;

pub use mode::{Mode, ModeSet, Phase};
pub use phase_clock::{Advance, PhaseClock, PhaseCompletion, TimerState};
