use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tempfile::TempDir;

use tillsammans::engine::summary::{self, Badge};
use tillsammans::i18n::Locale;
use tillsammans::lesson::LessonCatalog;
use tillsammans::session::widgets::{Exercise, Feedback, PhoneApp};
use tillsammans::session::{LessonRunner, StepChange};
use tillsammans::store::{JsonStore, ProgressStore};

fn progress_in(dir: &TempDir) -> ProgressStore {
    let store = JsonStore::with_base_dir(dir.path().join("data")).unwrap();
    ProgressStore::load(store)
}

fn type_text(runner: &mut LessonRunner, text: &str, now: Instant) {
    let Some(Exercise::MessageComposer(composer)) = runner.exercise_mut() else {
        panic!("expected a message composer");
    };
    for ch in text.chars() {
        composer.handle_key(KeyEvent::from(KeyCode::Char(ch)), now);
    }
    composer.handle_key(KeyEvent::from(KeyCode::Enter), now);
}

/// Walks every step of the English SMS lesson the way a learner would.
fn run_sms_lesson(catalog: &LessonCatalog, progress: &mut ProgressStore) {
    let mut runner = LessonRunner::open(catalog, Locale::En, "sms-basics").unwrap();
    assert_eq!(runner.lesson().step_count(), 4);

    // Welcome
    assert!(runner.toggle_hint());
    assert_eq!(runner.next(progress), StepChange::Moved(1));
    assert!(!runner.hint_visible());

    // Phone home screen: wrong app first, then Messages.
    let t0 = Instant::now();
    assert_eq!(runner.next(progress), StepChange::Unchanged);
    let Some(Exercise::PhoneSimulator(phone)) = runner.exercise_mut() else {
        panic!("expected the phone simulator");
    };
    phone.select(PhoneApp::Camera, t0);
    assert_eq!(phone.feedback(), Feedback::None);
    phone.select(PhoneApp::Messages, t0);
    assert_eq!(runner.poll(t0 + Duration::from_millis(1400), progress), StepChange::Unchanged);
    assert_eq!(runner.poll(t0 + Duration::from_millis(1500), progress), StepChange::Moved(2));

    // Composer: a miss, then the expected text in different casing.
    let t1 = t0 + Duration::from_secs(2);
    type_text(&mut runner, "Hello", t1);
    assert_eq!(runner.exercise().map(Exercise::feedback), Some(Feedback::Incorrect));
    {
        let Some(Exercise::MessageComposer(composer)) = runner.exercise_mut() else {
            panic!("expected a message composer");
        };
        for _ in 0..5 {
            composer.handle_key(KeyEvent::from(KeyCode::Backspace), t1);
        }
        assert_eq!(composer.feedback(), Feedback::None);
    }
    type_text(&mut runner, "  hi!  ", t1);
    assert_eq!(runner.exercise().map(Exercise::feedback), Some(Feedback::Correct));
    assert_eq!(runner.poll(t1 + Duration::from_millis(1500), progress), StepChange::Moved(3));

    // Quiz step is the last one; Next finishes.
    assert!(runner.is_last_step());
    assert_eq!(runner.next(progress), StepChange::Completed);
    assert!(runner.is_completed());
    assert_eq!(runner.next(progress), StepChange::Unchanged);
}

#[test]
fn sms_lesson_awards_points_once() {
    let dir = TempDir::new().unwrap();
    let catalog = LessonCatalog::load_embedded().unwrap();
    let mut progress = progress_in(&dir);

    run_sms_lesson(&catalog, &mut progress);
    assert_eq!(progress.points(), 100);
    assert_eq!(progress.completed_lessons(), ["sms-basics".to_string()]);

    // Repeating a finished lesson changes nothing.
    run_sms_lesson(&catalog, &mut progress);
    assert_eq!(progress.points(), 100);
    assert_eq!(progress.completed_lessons().len(), 1);

    // A fresh load sees the persisted record.
    let reloaded = progress_in(&dir);
    assert_eq!(reloaded.points(), 100);
    assert!(reloaded.record().last_updated.is_some());
}

#[test]
fn completion_unlocks_and_earns_first_badge() {
    let dir = TempDir::new().unwrap();
    let catalog = LessonCatalog::load_embedded().unwrap();
    let mut progress = progress_in(&dir);

    let before = summary::summarize(catalog.lessons(Locale::Sv), progress.record());
    assert!(before.badges.is_empty());

    run_sms_lesson(&catalog, &mut progress);

    let scam = catalog.lesson(Locale::Sv, "scam-awareness").unwrap();
    assert!(!scam.is_locked(|id| progress.is_completed(id)));

    let after = summary::summarize(catalog.lessons(Locale::Sv), progress.record());
    assert_eq!(after.completed, 1);
    assert_eq!(after.minutes, 10);
    assert_eq!(after.badges, vec![Badge::FirstStep]);
    assert_eq!(after.recent[0].id, "sms-basics");
}

#[test]
fn reset_clears_saved_progress() {
    let dir = TempDir::new().unwrap();
    let catalog = LessonCatalog::load_embedded().unwrap();
    let mut progress = progress_in(&dir);

    run_sms_lesson(&catalog, &mut progress);
    progress.reset();
    assert_eq!(progress.points(), 0);
    assert!(!dir.path().join("data").join("user_progress.json").exists());

    let reloaded = progress_in(&dir);
    assert!(reloaded.completed_lessons().is_empty());
}

#[test]
fn every_locale_has_the_same_lessons() {
    let catalog = LessonCatalog::load_embedded().unwrap();
    let ids = |locale| {
        catalog
            .lessons(locale)
            .iter()
            .map(|l| l.id.clone())
            .collect::<Vec<_>>()
    };
    let swedish = ids(Locale::Sv);
    for locale in [Locale::En, Locale::Ar, Locale::Ti, Locale::Fr] {
        assert_eq!(ids(locale), swedish, "lesson ids differ for {locale}");
    }
}
