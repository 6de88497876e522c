use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::i18n::Locale;
use crate::lesson::{Lesson, LessonCatalog, Step};
use crate::session::widgets::Exercise;
use crate::store::ProgressStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("no lesson {id:?} in the {locale} catalog")]
    LessonNotFound { id: String, locale: Locale },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerState {
    Viewing(usize),
    Completed,
}

/// Result of a navigation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepChange {
    Moved(usize),
    Completed,
    Unchanged,
}

/// Walks one learner through one lesson. Never persisted: leaving the lesson
/// drops the runner, and re-entering starts again at the first step.
#[derive(Debug)]
pub struct LessonRunner {
    lesson: Lesson,
    state: RunnerState,
    hint_visible: bool,
    exercise: Option<Exercise>,
    awarded: bool,
}

impl LessonRunner {
    pub fn open(catalog: &LessonCatalog, locale: Locale, id: &str) -> Result<Self, RunnerError> {
        let lesson = catalog
            .lesson(locale, id)
            .ok_or_else(|| RunnerError::LessonNotFound {
                id: id.to_string(),
                locale,
            })?;
        info!(lesson = id, %locale, "lesson opened");
        Ok(Self::new(lesson.clone()))
    }

    pub fn new(lesson: Lesson) -> Self {
        let mut runner = Self {
            lesson,
            state: RunnerState::Viewing(0),
            hint_visible: false,
            exercise: None,
            awarded: false,
        };
        runner.mount_exercise();
        runner
    }

    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == RunnerState::Completed
    }

    pub fn step_index(&self) -> Option<usize> {
        match self.state {
            RunnerState::Viewing(i) => Some(i),
            RunnerState::Completed => None,
        }
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.step_index().and_then(|i| self.lesson.steps.get(i))
    }

    pub fn is_last_step(&self) -> bool {
        self.step_index()
            .is_some_and(|i| i + 1 >= self.lesson.steps.len())
    }

    /// Fraction of the lesson reached, counting the current step.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.lesson.steps.len();
        match self.state {
            RunnerState::Completed => 1.0,
            RunnerState::Viewing(_) if total == 0 => 0.0,
            RunnerState::Viewing(i) => (i + 1) as f64 / total as f64,
        }
    }

    pub fn hint_visible(&self) -> bool {
        self.hint_visible
    }

    pub fn exercise(&self) -> Option<&Exercise> {
        self.exercise.as_ref()
    }

    pub fn exercise_mut(&mut self) -> Option<&mut Exercise> {
        self.exercise.as_mut()
    }

    /// Moves forward one step, or completes the lesson from the last step.
    /// Completion awards the lesson's points once per runner.
    pub fn advance(&mut self, progress: &mut ProgressStore) -> StepChange {
        let RunnerState::Viewing(i) = self.state else {
            return StepChange::Unchanged;
        };
        if i + 1 < self.lesson.steps.len() {
            self.enter(i + 1);
            return StepChange::Moved(i + 1);
        }

        self.state = RunnerState::Completed;
        self.hint_visible = false;
        self.exercise = None;
        if !self.awarded {
            self.awarded = true;
            let newly = progress.complete_lesson(&self.lesson.id, self.lesson.points);
            debug!(lesson = %self.lesson.id, newly, "completion recorded");
        }
        StepChange::Completed
    }

    /// The learner's "Next" action. Interactive steps move on only through
    /// their exercise.
    pub fn next(&mut self, progress: &mut ProgressStore) -> StepChange {
        match self.current_step() {
            Some(step) if step.has_next_action() => self.advance(progress),
            _ => StepChange::Unchanged,
        }
    }

    pub fn retreat(&mut self) -> StepChange {
        match self.state {
            RunnerState::Viewing(i) if i > 0 => {
                self.enter(i - 1);
                StepChange::Moved(i - 1)
            }
            _ => StepChange::Unchanged,
        }
    }

    /// Returns the new visibility. Steps without a hint keep it hidden.
    pub fn toggle_hint(&mut self) -> bool {
        if self.current_step().is_some_and(|s| s.hint.is_some()) {
            self.hint_visible = !self.hint_visible;
        }
        self.hint_visible
    }

    /// Drives the mounted exercise; a finished exercise advances the lesson.
    pub fn poll(&mut self, now: Instant, progress: &mut ProgressStore) -> StepChange {
        let done = self.exercise.as_mut().is_some_and(|e| e.poll(now));
        if done {
            self.advance(progress)
        } else {
            StepChange::Unchanged
        }
    }

    fn enter(&mut self, index: usize) {
        self.state = RunnerState::Viewing(index);
        self.hint_visible = false;
        self.mount_exercise();
    }

    fn mount_exercise(&mut self) {
        self.exercise = self
            .current_step()
            .and_then(|s| s.widget.as_ref())
            .and_then(Exercise::mount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::widgets::{Feedback, PhoneApp, ScamAnswer};
    use crate::store::JsonStore;
    use std::time::Duration;
    use tempfile::TempDir;

    fn make_progress() -> (TempDir, ProgressStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, ProgressStore::load(store))
    }

    fn open(id: &str) -> LessonRunner {
        let catalog = LessonCatalog::load_embedded().unwrap();
        LessonRunner::open(&catalog, Locale::En, id).unwrap()
    }

    #[test]
    fn unknown_lesson_is_not_found() {
        let catalog = LessonCatalog::load_embedded().unwrap();
        let err = LessonRunner::open(&catalog, Locale::Sv, "does-not-exist").unwrap_err();
        assert_eq!(
            err,
            RunnerError::LessonNotFound {
                id: "does-not-exist".into(),
                locale: Locale::Sv
            }
        );
    }

    #[test]
    fn starts_at_first_step() {
        let runner = open("sms-basics");
        assert_eq!(runner.state(), RunnerState::Viewing(0));
        assert!(!runner.hint_visible());
        assert!(runner.exercise().is_none());
    }

    #[test]
    fn retreat_at_first_step_is_noop() {
        let mut runner = open("bankid-intro");
        assert_eq!(runner.retreat(), StepChange::Unchanged);
        assert_eq!(runner.state(), RunnerState::Viewing(0));
    }

    #[test]
    fn advance_from_last_step_completes() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("bankid-intro");
        assert_eq!(runner.advance(&mut progress), StepChange::Moved(1));
        assert_eq!(runner.advance(&mut progress), StepChange::Moved(2));
        assert!(runner.is_last_step());
        assert_eq!(runner.advance(&mut progress), StepChange::Completed);
        assert!(runner.is_completed());
        assert!(runner.current_step().is_none());
        assert_eq!(runner.advance(&mut progress), StepChange::Unchanged);
        assert_eq!(runner.retreat(), StepChange::Unchanged);
        assert_eq!(progress.points(), 150);
    }

    #[test]
    fn hint_resets_on_every_transition() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("sms-basics");
        assert!(runner.toggle_hint());
        runner.advance(&mut progress);
        assert!(!runner.hint_visible());

        assert!(runner.toggle_hint());
        runner.retreat();
        assert!(!runner.hint_visible());
    }

    #[test]
    fn hint_toggle_needs_a_hint() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("sms-basics");
        runner.advance(&mut progress);
        runner.advance(&mut progress);
        // write-message has no hint
        assert!(runner.current_step().unwrap().hint.is_none());
        assert!(!runner.toggle_hint());
        assert!(!runner.hint_visible());
    }

    #[test]
    fn next_is_refused_on_interactive_steps() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("sms-basics");
        assert_eq!(runner.next(&mut progress), StepChange::Moved(1));
        assert_eq!(runner.next(&mut progress), StepChange::Unchanged);
        assert_eq!(runner.state(), RunnerState::Viewing(1));
    }

    #[test]
    fn exercise_completion_advances_once() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("sms-basics");
        runner.advance(&mut progress);

        let t0 = Instant::now();
        let Some(Exercise::PhoneSimulator(phone)) = runner.exercise_mut() else {
            panic!("expected phone simulator");
        };
        phone.select(PhoneApp::Messages, t0);
        assert_eq!(runner.poll(t0, &mut progress), StepChange::Unchanged);
        assert_eq!(
            runner.poll(t0 + Duration::from_millis(1500), &mut progress),
            StepChange::Moved(2)
        );
        assert!(matches!(runner.exercise(), Some(Exercise::MessageComposer(_))));
        assert_eq!(
            runner.poll(t0 + Duration::from_secs(10), &mut progress),
            StepChange::Unchanged
        );
    }

    #[test]
    fn leaving_a_step_cancels_pending_completion() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("scam-awareness");
        runner.advance(&mut progress);
        runner.advance(&mut progress);

        let t0 = Instant::now();
        let Some(Exercise::ScamDetector(detector)) = runner.exercise_mut() else {
            panic!("expected scam detector");
        };
        detector.choose(ScamAnswer::Fraudulent, t0);
        assert_eq!(runner.exercise().unwrap().feedback(), Feedback::Correct);

        runner.retreat();
        assert_eq!(
            runner.poll(t0 + Duration::from_secs(5), &mut progress),
            StepChange::Unchanged
        );
        assert_eq!(runner.state(), RunnerState::Viewing(1));
    }

    #[test]
    fn progress_ratio_counts_current_step() {
        let (_dir, mut progress) = make_progress();
        let mut runner = open("sms-basics");
        assert_eq!(runner.progress_ratio(), 0.25);
        runner.advance(&mut progress);
        assert_eq!(runner.progress_ratio(), 0.5);
    }
}
