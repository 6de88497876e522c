pub mod app_finder;
pub mod message_composer;
pub mod phone_simulator;
pub mod scam_detector;

use std::time::Instant;

use crate::lesson::StepWidget;

pub use app_finder::{AppFinder, FinderApp};
pub use message_composer::MessageComposer;
pub use phone_simulator::{PhoneApp, PhoneSimulator};
pub use scam_detector::{ScamAnswer, ScamDetector};

/// Inline outcome shown under an exercise.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Incorrect,
}

/// Keyboard highlight over a fixed list of options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceCursor {
    index: usize,
    len: usize,
}

impl ChoiceCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn next(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn prev(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn set(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }
}

/// The mounted exercise of the current step. Dropping it cancels any pending
/// completion.
#[derive(Debug)]
pub enum Exercise {
    PhoneSimulator(PhoneSimulator),
    MessageComposer(MessageComposer),
    ScamDetector(ScamDetector),
    AppFinder(AppFinder),
}

impl Exercise {
    /// `None` for widgets that do not end their step themselves.
    pub fn mount(widget: &StepWidget) -> Option<Self> {
        match widget {
            StepWidget::PhoneSimulator => Some(Exercise::PhoneSimulator(PhoneSimulator::new())),
            StepWidget::MessageComposer { expected } => {
                Some(Exercise::MessageComposer(MessageComposer::new(expected)))
            }
            StepWidget::ScamDetector => Some(Exercise::ScamDetector(ScamDetector::new())),
            StepWidget::AppFinder => Some(Exercise::AppFinder(AppFinder::new())),
            StepWidget::SupportPopup => None,
        }
    }

    pub fn feedback(&self) -> Feedback {
        match self {
            Exercise::PhoneSimulator(w) => w.feedback(),
            Exercise::MessageComposer(w) => w.feedback(),
            Exercise::ScamDetector(w) => w.feedback(),
            Exercise::AppFinder(w) => w.feedback(),
        }
    }

    pub fn is_solved(&self) -> bool {
        self.feedback() == Feedback::Correct
    }

    /// True exactly once, when the success delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self {
            Exercise::PhoneSimulator(w) => w.poll(now),
            Exercise::MessageComposer(w) => w.poll(now),
            Exercise::ScamDetector(w) => w.poll(now),
            Exercise::AppFinder(w) => w.poll(now),
        }
    }
}
