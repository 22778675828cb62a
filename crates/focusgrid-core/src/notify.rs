//! Phase-completion notifications.
//!
//! Sound, desktop notifications and similar side effects sit behind
//! [`PhaseSink`]. The core calls the sink and ignores the outcome; a missing
//! backend is a [`NoopSink`].

use std::cell::RefCell;

use serde::Serialize;

use crate::timer::{Phase, PhaseCompletion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub next_phase: Phase,
    pub phase_duration_minutes: u32,
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn for_completion(completion: &PhaseCompletion) -> Self {
        let minutes = completion.next_duration_minutes;
        let (title, body) = match completion.next_phase {
            Phase::Break => (
                "Focus done!".to_string(),
                format!("Great job. Time for a {minutes}-min break."),
            ),
            Phase::Focus => (
                "Break over".to_string(),
                format!("Back to focus: {minutes} minutes."),
            ),
        };
        Self {
            next_phase: completion.next_phase,
            phase_duration_minutes: minutes,
            title,
            body,
        }
    }
}

/// Receives phase-completion notifications. Fire-and-forget.
pub trait PhaseSink {
    fn phase_completed(&self, notification: &Notification);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl PhaseSink for NoopSink {
    fn phase_completed(&self, _notification: &Notification) {}
}

/// Keeps every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: RefCell<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.borrow().clone()
    }
}

impl PhaseSink for RecordingSink {
    fn phase_completed(&self, notification: &Notification) {
        self.received.borrow_mut().push(notification.clone());
    }
}

impl<T: PhaseSink + ?Sized> PhaseSink for std::rc::Rc<T> {
    fn phase_completed(&self, notification: &Notification) {
        (**self).phase_completed(notification)
    }
}
