use std::time::{Duration, Instant};

use super::{ChoiceCursor, Feedback};
use crate::session::timer::CompletionTimer;

pub const SUCCESS_DELAY: Duration = Duration::from_millis(2000);

pub const WARNING_SIGNAL_KEYS: [&str; 4] = [
    "interactive.scam_detector.warning_signal_1",
    "interactive.scam_detector.warning_signal_2",
    "interactive.scam_detector.warning_signal_3",
    "interactive.scam_detector.warning_signal_4",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScamAnswer {
    Genuine,
    Fraudulent,
}

pub const ALL_ANSWERS: [ScamAnswer; 2] = [ScamAnswer::Genuine, ScamAnswer::Fraudulent];

impl ScamAnswer {
    pub fn label_key(self) -> &'static str {
        match self {
            ScamAnswer::Genuine => "interactive.scam_detector.answer_real",
            ScamAnswer::Fraudulent => "interactive.scam_detector.answer_scam",
        }
    }
}

/// A simulated text message to classify. The message is always a scam.
#[derive(Debug)]
pub struct ScamDetector {
    cursor: ChoiceCursor,
    answer: Option<ScamAnswer>,
    timer: Option<CompletionTimer>,
}

impl Default for ScamDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl ScamDetector {
    pub fn new() -> Self {
        Self {
            cursor: ChoiceCursor::new(ALL_ANSWERS.len()),
            answer: None,
            timer: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor.index()
    }

    pub fn cursor_mut(&mut self) -> &mut ChoiceCursor {
        &mut self.cursor
    }

    pub fn answer(&self) -> Option<ScamAnswer> {
        self.answer
    }

    /// Ignored while feedback is showing.
    pub fn choose(&mut self, answer: ScamAnswer, now: Instant) {
        if self.answer.is_some() {
            return;
        }
        self.answer = Some(answer);
        if answer == ScamAnswer::Fraudulent {
            self.timer = Some(CompletionTimer::start(now, SUCCESS_DELAY));
        }
    }

    pub fn choose_highlighted(&mut self, now: Instant) {
        self.choose(ALL_ANSWERS[self.cursor.index()], now);
    }

    /// Clears a wrong answer so the question can be answered again.
    pub fn retry(&mut self) {
        if self.answer == Some(ScamAnswer::Genuine) {
            self.answer = None;
        }
    }

    pub fn feedback(&self) -> Feedback {
        match self.answer {
            None => Feedback::None,
            Some(ScamAnswer::Fraudulent) => Feedback::Correct,
            Some(ScamAnswer::Genuine) => Feedback::Incorrect,
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
    fn scam_answer_completes_after_two_seconds() {
        let t0 = Instant::now();
        let mut detector = ScamDetector::new();
        detector.choose(ScamAnswer::Fraudulent, t0);
        assert_eq!(detector.feedback(), Feedback::Correct);
        assert!(!detector.poll(t0 + Duration::from_millis(1999)));
        assert!(detector.poll(t0 + SUCCESS_DELAY));
        assert!(!detector.poll(t0 + SUCCESS_DELAY));
    }

    #[test]
    fn genuine_needs_retry_before_answering_again() {
        let t0 = Instant::now();
        let mut detector = ScamDetector::new();
        detector.choose(ScamAnswer::Genuine, t0);
        assert_eq!(detector.feedback(), Feedback::Incorrect);

        // Locked until retry.
        detector.choose(ScamAnswer::Fraudulent, t0);
        assert_eq!(detector.answer(), Some(ScamAnswer::Genuine));

        detector.retry();
        assert_eq!(detector.feedback(), Feedback::None);
        detector.choose(ScamAnswer::Fraudulent, t0);
        assert_eq!(detector.feedback(), Feedback::Correct);
    }

    #[test]
    fn retry_after_success_does_nothing() {
        let t0 = Instant::now();
        let mut detector = ScamDetector::new();
        detector.choose(ScamAnswer::Fraudulent, t0);
        detector.retry();
        assert_eq!(detector.feedback(), Feedback::Correct);
        assert!(detector.poll(t0 + SUCCESS_DELAY));
    }

    #[test]
    fn highlighted_choice() {
        let t0 = Instant::now();
        let mut detector = ScamDetector::new();
        detector.cursor_mut().next();
        detector.choose_highlighted(t0);
        assert_eq!(detector.answer(), Some(ScamAnswer::Fraudulent));
    }
}
