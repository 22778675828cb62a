use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase that follows this one. Phases strictly alternate.
    pub fn next(self) -> Phase {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "Focus",
            Phase::Break => "Break",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A named focus/break pair. Both durations are positive; see [`Mode::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode {
    name: String,
    focus_minutes: u32,
    break_minutes: u32,
}

impl Mode {
    /// # Errors
    /// Returns `InvalidArgument` if either duration is zero or the name is blank.
    pub fn new(name: impl Into<String>, focus_minutes: u32, break_minutes: u32) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CoreError::invalid_argument("name", "mode name is empty"));
        }
        if focus_minutes == 0 {
            return Err(CoreError::invalid_argument(
                "focus_minutes",
                "must be greater than zero",
            ));
        }
        if break_minutes == 0 {
            return Err(CoreError::invalid_argument(
                "break_minutes",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            name,
            focus_minutes,
            break_minutes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    pub fn minutes(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Focus => self.focus_minutes,
            Phase::Break => self.break_minutes,
        }
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        u64::from(self.minutes(phase)).saturating_mul(60)
    }

    /// The 25-minute focus / 5-minute break classic.
    pub fn classic() -> Self {
        Self {
            name: "25 / 5".into(),
            focus_minutes: 25,
            break_minutes: 5,
        }
    }

    pub fn extended() -> Self {
        Self {
            name: "50 / 10".into(),
            focus_minutes: 50,
            break_minutes: 10,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self::classic()
    }
}

/// Ordered set of selectable modes, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeSet {
    modes: Vec<Mode>,
}

impl ModeSet {
    pub fn builtin() -> Self {
        Self {
            modes: vec![Mode::extended(), Mode::classic()],
        }
    }

    /// Add a mode, replacing any existing mode with the same name.
    pub fn insert(&mut self, mode: Mode) {
        match self.modes.iter_mut().find(|m| m.name == mode.name) {
            Some(existing) => *existing = mode,
            None => self.modes.push(mode),
        }
    }

    /// # Errors
    /// Returns `InvalidModeSelection` if no mode has this name.
    pub fn get(&self, name: &str) -> Result<&Mode> {
        self.modes
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CoreError::InvalidModeSelection(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mode> {
        self.modes.iter()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl Default for ModeSet {
    fn default() -> Self {
        Self::builtin()
    }
}
