use std::time::{Duration, Instant};

use super::{ChoiceCursor, Feedback};
use crate::session::timer::CompletionTimer;

pub const SUCCESS_DELAY: Duration = Duration::from_millis(2000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinderApp {
    BankId,
    BankLogIn,
    IdVerify,
    Swish,
}

pub const ALL_FINDER_APPS: [FinderApp; 4] = [
    FinderApp::BankId,
    FinderApp::BankLogIn,
    FinderApp::IdVerify,
    FinderApp::Swish,
];

impl FinderApp {
    pub fn label_key(self) -> &'static str {
        match self {
            FinderApp::BankId => "interactive.app_finder.apps.bank_id",
            FinderApp::BankLogIn => "interactive.app_finder.apps.bank_log_in",
            FinderApp::IdVerify => "interactive.app_finder.apps.id_verify",
            FinderApp::Swish => "interactive.app_finder.apps.swish",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FinderApp::BankId => "🔐",
            FinderApp::BankLogIn => "🏦",
            FinderApp::IdVerify => "✓",
            FinderApp::Swish => "💸",
        }
    }
}

/// 2x2 grid of look-alike apps; only the real BankID app is correct.
#[derive(Debug)]
pub struct AppFinder {
    cursor: ChoiceCursor,
    selected: Option<FinderApp>,
    timer: Option<CompletionTimer>,
}

impl Default for AppFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppFinder {
    pub fn new() -> Self {
        Self {
            cursor: ChoiceCursor::new(ALL_FINDER_APPS.len()),
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

    pub fn selected(&self) -> Option<FinderApp> {
        self.selected
    }

    /// The grid is inert while feedback is showing.
    pub fn select(&mut self, app: FinderApp, now: Instant) {
        if self.selected.is_some() {
            return;
        }
        self.selected = Some(app);
        if app == FinderApp::BankId {
            self.timer = Some(CompletionTimer::start(now, SUCCESS_DELAY));
        }
    }

    pub fn select_highlighted(&mut self, now: Instant) {
        self.select(ALL_FINDER_APPS[self.cursor.index()], now);
    }

    pub fn retry(&mut self) {
        if self.feedback() == Feedback::Incorrect {
            self.selected = None;
        }
    }

    pub fn feedback(&self) -> Feedback {
        match self.selected {
            None => Feedback::None,
            Some(FinderApp::BankId) => Feedback::Correct,
            Some(_) => Feedback::Incorrect,
        }
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.timer.as_mut().is_some_and(|t| t.poll(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bankid_completes_after_delay() {
        let t0 = Instant::now();
        let mut finder = AppFinder::new();
        finder.select(FinderApp::BankId, t0);
        assert_eq!(finder.feedback(), Feedback::Correct);
        assert!(!finder.poll(t0 + Duration::from_millis(1500)));
        assert!(finder.poll(t0 + Duration::from_millis(2000)));
        assert!(!finder.poll(t0 + Duration::from_millis(4000)));
    }

    #[test]
    fn wrong_app_locks_grid_until_retry() {
        let t0 = Instant::now();
        let mut finder = AppFinder::new();
        finder.select(FinderApp::Swish, t0);
        assert_eq!(finder.feedback(), Feedback::Incorrect);

        finder.select(FinderApp::BankId, t0);
        assert_eq!(finder.selected(), Some(FinderApp::Swish));

        finder.retry();
        assert_eq!(finder.selected(), None);
        finder.select(FinderApp::BankId, t0);
        assert_eq!(finder.feedback(), Feedback::Correct);
    }

    #[test]
    fn unlimited_retries() {
        let t0 = Instant::now();
        let mut finder = AppFinder::new();
        for app in [FinderApp::BankLogIn, FinderApp::IdVerify, FinderApp::Swish] {
            for _ in 0..5 {
                finder.select(app, t0);
                assert_eq!(finder.feedback(), Feedback::Incorrect);
                finder.retry();
            }
        }
        assert!(!finder.poll(t0 + Duration::from_secs(30)));
    }

    #[test]
    fn retry_keeps_correct_answer() {
        let t0 = Instant::now();
        let mut finder = AppFinder::new();
        finder.select(FinderApp::BankId, t0);
        finder.retry();
        assert_eq!(finder.selected(), Some(FinderApp::BankId));
    }
}
