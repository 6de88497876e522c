use std::time::{Duration, Instant};

use super::{ChoiceCursor, Feedback};
use crate::session::timer::CompletionTimer;

pub const SUCCESS_DELAY: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhoneApp {
    Messages,
    Phone,
    Camera,
    Settings,
}

pub const ALL_PHONE_APPS: [PhoneApp; 4] = [
    PhoneApp::Messages,
    PhoneApp::Phone,
    PhoneApp::Camera,
    PhoneApp::Settings,
];

impl PhoneApp {
    pub fn label_key(self) -> &'static str {
        match self {
            PhoneApp::Messages => "interactive.phone_simulator.apps.messages",
            PhoneApp::Phone => "interactive.phone_simulator.apps.phone",
            PhoneApp::Camera => "interactive.phone_simulator.apps.camera",
            PhoneApp::Settings => "interactive.phone_simulator.apps.settings",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PhoneApp::Messages => "💬",
            PhoneApp::Phone => "📞",
            PhoneApp::Camera => "📷",
            PhoneApp::Settings => "⚙",
        }
    }
}

/// Home screen with four apps; opening Messages solves it. Other apps only
/// get highlighted.
#[derive(Debug)]
pub struct PhoneSimulator {
    cursor: ChoiceCursor,
    selected: Option<PhoneApp>,
    timer: Option<CompletionTimer>,
}

impl Default for PhoneSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneSimulator {
    pub fn new() -> Self {
        Self {
            cursor: ChoiceCursor::new(ALL_PHONE_APPS.len()),
            selected: None,
            timer: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn cursor_mut(&mut self) -> &mut ChoiceCursor {
        &mut self.cursor
    }

    pub fn selected(&self) -> Option<PhoneApp> {
        self.selected
    }

    pub fn select(&mut self, app: PhoneApp, now: Instant) {
        if self.timer.is_some() {
            return;
        }
        self.selected = Some(app);
        if app == PhoneApp::Messages {
            self.timer = Some(CompletionTimer::start(now, SUCCESS_DELAY));
        }
    }

    pub fn select_highlighted(&mut self, now: Instant) {
        self.select(ALL_PHONE_APPS[self.cursor.index()], now);
    }

    pub fn feedback(&self) -> Feedback {
        if self.timer.is_some() {
            Feedback::Correct
        } else {
            Feedback::None
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.timer.as_mut().is_some_and(|t| t.poll(now))
    }
}
