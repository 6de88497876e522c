use chrono::{DateTime, Utc};

use crate::lesson::Lesson;
use crate::store::schema::ProgressRecord;

const RECENT_ACTIVITY_LEN: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    FirstStep,
    Explorer,
    ConfidentLearner,
    DigitalMaster,
}

pub const ALL_BADGES: [Badge; 4] = [
    Badge::FirstStep,
    Badge::Explorer,
    Badge::ConfidentLearner,
    Badge::DigitalMaster,
];

impl Badge {
    fn key(self) -> &'static str {
        match self {
            Badge::FirstStep => "first_step",
            Badge::Explorer => "explorer",
            Badge::ConfidentLearner => "confident_learner",
            Badge::DigitalMaster => "digital_master",
        }
    }

    pub fn title_key(self) -> String {
        format!("badges.{}.title", self.key())
    }

    pub fn description_key(self) -> String {
        format!("badges.{}.description", self.key())
    }

    pub fn icon(self) -> &'static str {
        match self {
            Badge::FirstStep => "🎉",
            Badge::Explorer => "🧭",
            Badge::ConfidentLearner => "⭐",
            Badge::DigitalMaster => "🏆",
        }
    }

    pub fn is_earned(self, completed: usize, total: usize) -> bool {
        match self {
            Badge::FirstStep => completed >= 1,
            Badge::Explorer => completed >= 3,
            Badge::ConfidentLearner => completed >= 5,
            Badge::DigitalMaster => total > 0 && completed >= total,
        }
    }
}

/// Figures for the progress screen, computed against one locale's catalog.
#[derive(Clone, Debug)]
pub struct ProgressSummary<'a> {
    pub completed: usize,
    pub total: usize,
    pub points: u32,
    pub minutes: u32,
    /// Most recent first.
    pub recent: Vec<&'a Lesson>,
    pub badges: Vec<Badge>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl ProgressSummary<'_> {
    pub fn completion_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }

    pub fn completion_percent(&self) -> u32 {
        (self.completion_ratio() * 100.0).round() as u32
    }
}

/// Ids missing from the catalog are ignored, except in the points total which
/// comes straight from the record.
pub fn summarize<'a>(lessons: &'a [Lesson], record: &ProgressRecord) -> ProgressSummary<'a> {
    let done: Vec<&Lesson> = record
        .completed_lessons
        .iter()
        .filter_map(|id| lessons.iter().find(|l| &l.id == id))
        .collect();

    let completed = done.len();
    let total = lessons.len();
    let minutes = done.iter().map(|l| l.duration_minutes).sum();
    let recent = done.iter().rev().take(RECENT_ACTIVITY_LEN).copied().collect();
    let badges = ALL_BADGES
        .into_iter()
        .filter(|b| b.is_earned(completed, total))
        .collect();

    ProgressSummary {
        completed,
        total,
        points: record.points,
        minutes,
        recent,
        badges,
        last_updated: record.last_updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::lesson::LessonCatalog;

    fn lessons() -> Vec<Lesson> {
        LessonCatalog::load_embedded()
            .unwrap()
            .lessons(Locale::Sv)
            .to_vec()
    }

    fn record(ids: &[&str], points: u32) -> ProgressRecord {
        ProgressRecord {
            completed_lessons: ids.iter().map(|s| s.to_string()).collect(),
            points,
            last_updated: None,
        }
    }

    #[test]
    fn empty_progress() {
        let lessons = lessons();
        let summary = summarize(&lessons, &ProgressRecord::default());
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.minutes, 0);
        assert!(summary.recent.is_empty());
        assert!(summary.badges.is_empty());
        assert_eq!(summary.completion_percent(), 0);
    }

    #[test]
    fn time_is_sum_of_completed_durations() {
        let lessons = lessons();
        let summary = summarize(&lessons, &record(&["sms-basics", "bankid-intro"], 250));
        assert_eq!(summary.minutes, 25);
        assert_eq!(summary.points, 250);
        assert_eq!(summary.completion_percent(), 50);
        assert_eq!(summary.badges, vec![Badge::FirstStep]);
    }

    #[test]
    fn recent_activity_is_newest_first_and_capped() {
        let lessons = lessons();
        let ids = ["bankid-intro", "sms-basics", "health-1177", "scam-awareness"];
        let summary = summarize(&lessons, &record(&ids, 625));
        let recent: Vec<_> = summary.recent.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(recent, vec!["scam-awareness", "health-1177", "sms-basics"]);
        assert_eq!(
            summary.badges,
            vec![Badge::FirstStep, Badge::Explorer, Badge::DigitalMaster]
        );
        assert_eq!(summary.completion_ratio(), 1.0);
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let lessons = lessons();
        let summary = summarize(&lessons, &record(&["retired-lesson"], 40));
        assert_eq!(summary.completed, 0);
        assert_eq!(summary.points, 40);
    }

    #[test]
    fn master_badge_needs_a_catalog() {
        assert!(!Badge::DigitalMaster.is_earned(0, 0));
        assert!(Badge::DigitalMaster.is_earned(4, 4));
        assert!(!Badge::ConfidentLearner.is_earned(4, 4));
    }
}
