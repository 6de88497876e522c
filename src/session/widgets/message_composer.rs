use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use icu_normalizer::ComposingNormalizerBorrowed;

use super::Feedback;
use crate::session::timer::CompletionTimer;
use crate::ui::line_input::{InputResult, LineInput};

pub const SUCCESS_DELAY: Duration = Duration::from_millis(1500);

/// Compares learner input with the expected message, ignoring surrounding
/// whitespace, letter case and Unicode composition differences.
pub fn matches_expected(input: &str, expected: &str) -> bool {
    fn fold(s: &str) -> String {
        ComposingNormalizerBorrowed::new_nfc()
            .normalize(s.trim())
            .to_lowercase()
    }
    fold(input) == fold(expected)
}

/// Free-text exercise: type the expected message and send it.
#[derive(Debug)]
pub struct MessageComposer {
    expected: String,
    input: LineInput,
    feedback: Feedback,
    timer: Option<CompletionTimer>,
}

impl MessageComposer {
    pub fn new(expected: &str) -> Self {
        Self {
            expected: expected.to_string(),
            input: LineInput::default(),
            feedback: Feedback::None,
            timer: None,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    pub fn input(&self) -> &LineInput {
        &self.input
    }

    /// Sending is only possible with non-blank text.
    pub fn can_send(&self) -> bool {
        self.timer.is_none() && !self.input.value().trim().is_empty()
    }

    /// Edits the draft. Enter sends; editing clears a failure message.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> InputResult {
        if self.timer.is_some() {
            return InputResult::Continue;
        }
        let result = self.input.handle(key);
        match result {
            InputResult::Changed if self.feedback == Feedback::Incorrect => {
                self.feedback = Feedback::None;
            }
            InputResult::Submit => self.submit(now),
            _ => {}
        }
        result
    }

    pub fn submit(&mut self, now: Instant) {
        if !self.can_send() {
            return;
        }
        if matches_expected(self.input.value(), &self.expected) {
            self.feedback = Feedback::Correct;
            self.timer = Some(CompletionTimer::start(now, SUCCESS_DELAY));
        } else {
            self.feedback = Feedback::Incorrect;
        }
    }

    pub fn feedback(&self) -> Feedback {
        self.feedback
    }

    pub fn poll(&mut self, now: Instant) -> bool {
        self.timer.as_mut().is_some_and(|t| t.poll(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut MessageComposer, text: &str, now: Instant) {
        for ch in text.chars() {
            composer.handle_key(key(KeyCode::Char(ch)), now);
        }
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        for input in ["hej!", "  Hej!  ", "HEJ!", "Hej!"] {
            assert!(matches_expected(input, "Hej!"), "{input:?}");
        }
        assert!(!matches_expected("Hej", "Hej!"));
        assert!(!matches_expected("Hej !", "Hej!"));
    }

    #[test]
    fn composition_differences_are_ignored() {
        assert!(matches_expected("Cafe\u{301}!", "Café!"));
        assert!(matches_expected("SALUT!", "Salut!"));
        assert!(matches_expected("مرحبا!", "مرحبا!"));
    }

    #[test]
    fn correct_message_completes_once() {
        let t0 = Instant::now();
        let mut composer = MessageComposer::new("Hej!");
        type_text(&mut composer, "hej!", t0);
        composer.handle_key(key(KeyCode::Enter), t0);
        assert_eq!(composer.feedback(), Feedback::Correct);
        assert!(!composer.poll(t0 + Duration::from_millis(1499)));
        assert!(composer.poll(t0 + SUCCESS_DELAY));
        assert!(!composer.poll(t0 + SUCCESS_DELAY));
    }

    #[test]
    fn wrong_message_then_edit_clears_feedback() {
        let t0 = Instant::now();
        let mut composer = MessageComposer::new("Hej!");
        type_text(&mut composer, "Hej", t0);
        composer.submit(t0);
        assert_eq!(composer.feedback(), Feedback::Incorrect);

        // Cursor movement keeps the message.
        composer.handle_key(key(KeyCode::Left), t0);
        assert_eq!(composer.feedback(), Feedback::Incorrect);
        composer.handle_key(key(KeyCode::End), t0);

        composer.handle_key(key(KeyCode::Char('!')), t0);
        assert_eq!(composer.feedback(), Feedback::None);
        composer.submit(t0);
        assert_eq!(composer.feedback(), Feedback::Correct);
    }

    #[test]
    fn blank_text_cannot_be_sent() {
        let t0 = Instant::now();
        let mut composer = MessageComposer::new("Hej!");
        assert!(!composer.can_send());
        type_text(&mut composer, "   ", t0);
        composer.submit(t0);
        assert_eq!(composer.feedback(), Feedback::None);
    }

    #[test]
    fn input_after_success_is_ignored() {
        let t0 = Instant::now();
        let mut composer = MessageComposer::new("Hi!");
        type_text(&mut composer, "Hi!", t0);
        composer.submit(t0);
        type_text(&mut composer, "xyz", t0);
        assert_eq!(composer.input().value(), "Hi!");
        assert!(!composer.can_send());
    }
}
