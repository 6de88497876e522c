use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PROGRESS_KEY: &str = "user_progress";
pub const FONT_SIZE_KEY: &str = "font_size";
pub const SUPPORT_DONT_SHOW_KEY: &str = "support_popup_dont_show";
pub const SUPPORT_LAST_SHOWN_KEY: &str = "support_popup_last_shown";

/// Persisted learner progress, keyed by lesson id so it is shared by all locales.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    /// Completion order is kept for the recent activity list.
    pub completed_lessons: Vec<String>,
    pub points: u32,
    pub last_updated: Option<DateTime<Utc>>,
}
