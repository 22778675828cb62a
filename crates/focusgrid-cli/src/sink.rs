use std::io::Write;

use focusgrid_core::{Notification, PhaseSink};

/// Bell and a printed line on the terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSink {
    sound: bool,
    notifications: bool,
}

impl TerminalSink {
    pub fn new(sound: bool, notifications: bool) -> Self {
        Self {
            sound,
            notifications,
        }
    }
}

impl PhaseSink for TerminalSink {
    fn phase_completed(&self, notification: &Notification) {
        let mut out = std::io::stdout().lock();
        if self.sound {
            let _ = write!(out, "\x07");
        }
        if self.notifications {
            let _ = writeln!(out, "\n{} {}", notification.title, notification.body);
        }
        let _ = out.flush();
    }
}
