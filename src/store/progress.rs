use chrono::Utc;
use tracing::{error, info, warn};

use crate::store::json_store::JsonStore;
use crate::store::schema::{PROGRESS_KEY, ProgressRecord};

/// Owns the learner's progress record. The in-memory copy is the only writer;
/// every mutation is flushed straight to the store.
#[derive(Debug)]
pub struct ProgressStore {
    store: JsonStore,
    record: ProgressRecord,
}

impl ProgressStore {
    /// Absent or unreadable progress is treated as no prior progress.
    pub fn load(store: JsonStore) -> Self {
        let record = match store.read::<ProgressRecord>(PROGRESS_KEY) {
            Ok(Some(record)) => record,
            Ok(None) => ProgressRecord::default(),
            Err(e) => {
                warn!("discarding unreadable progress: {e:#}");
                ProgressRecord::default()
            }
        };
        Self { store, record }
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn points(&self) -> u32 {
        self.record.points
    }

    /// Completed lesson ids in completion order.
    pub fn completed_lessons(&self) -> &[String] {
        &self.record.completed_lessons
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.record.completed_lessons.iter().any(|id| id == lesson_id)
    }

    /// Records a completion. Returns `false` and changes nothing when the
    /// lesson was already completed.
    pub fn complete_lesson(&mut self, lesson_id: &str, points: u32) -> bool {
        if self.is_completed(lesson_id) {
            return false;
        }
        self.record.completed_lessons.push(lesson_id.to_string());
        self.record.points = self.record.points.saturating_add(points);
        self.record.last_updated = Some(Utc::now());
        info!(
            lesson = lesson_id,
            points,
            total = self.record.points,
            "lesson completed"
        );
        self.flush();
        true
    }

    /// Clears progress and deletes the persisted record.
    pub fn reset(&mut self) {
        self.record = ProgressRecord::default();
        if let Err(e) = self.store.remove(PROGRESS_KEY) {
            error!("failed to delete progress: {e:#}");
        }
        info!("progress reset");
    }

    fn flush(&self) {
        if let Err(e) = self.store.write(PROGRESS_KEY, &self.record) {
            error!("failed to save progress: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn first_load_is_empty() {
        let (_dir, store) = make_store();
        let progress = ProgressStore::load(store);
        assert_eq!(progress.points(), 0);
        assert!(progress.completed_lessons().is_empty());
        assert!(progress.record().last_updated.is_none());
    }

    #[test]
    fn completing_twice_awards_once() {
        let (_dir, store) = make_store();
        let mut progress = ProgressStore::load(store);
        assert!(progress.complete_lesson("sms-basics", 100));
        assert!(!progress.complete_lesson("sms-basics", 100));
        assert_eq!(progress.points(), 100);
        assert_eq!(progress.completed_lessons(), ["sms-basics"]);
    }

    #[test]
    fn completion_is_flushed_immediately() {
        let (_dir, store) = make_store();
        let mut progress = ProgressStore::load(store.clone());
        progress.complete_lesson("sms-basics", 100);
        progress.complete_lesson("bankid-intro", 150);

        let reloaded = ProgressStore::load(store);
        assert_eq!(reloaded.points(), 250);
        assert_eq!(reloaded.completed_lessons(), ["sms-basics", "bankid-intro"]);
        assert!(reloaded.record().last_updated.is_some());
        assert!(reloaded.is_completed("bankid-intro"));
        assert!(!reloaded.is_completed("health-1177"));
    }

    #[test]
    fn reset_deletes_the_key() {
        let (dir, store) = make_store();
        let mut progress = ProgressStore::load(store.clone());
        progress.complete_lesson("sms-basics", 100);
        assert!(store.contains(PROGRESS_KEY));

        progress.reset();
        assert_eq!(progress.points(), 0);
        assert!(!store.contains(PROGRESS_KEY));
        assert!(!dir.path().join("user_progress.json").exists());

        let reloaded = ProgressStore::load(store);
        assert_eq!(reloaded.record(), &ProgressRecord::default());
    }

    #[test]
    fn corrupt_record_falls_back_to_defaults() {
        let (dir, store) = make_store();
        fs::write(dir.path().join("user_progress.json"), "{\"points\": \"many\"").unwrap();
        let progress = ProgressStore::load(store);
        assert_eq!(progress.points(), 0);
        assert!(progress.completed_lessons().is_empty());
    }

    #[test]
    fn reads_externally_written_record() {
        let (dir, store) = make_store();
        fs::write(
            dir.path().join("user_progress.json"),
            r#"{"completedLessons":["bankid-intro"],"points":150,"lastUpdated":"2026-01-02T03:04:05Z"}"#,
        )
        .unwrap();
        let progress = ProgressStore::load(store);
        assert!(progress.is_completed("bankid-intro"));
        assert_eq!(progress.points(), 150);
    }
}
