use crate::lesson::model::ALL_CATEGORIES;
use crate::lesson::{Category, Lesson};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LessonStatus {
    Locked,
    Available,
    Completed,
}

impl LessonStatus {
    pub fn can_open(self) -> bool {
        self != LessonStatus::Locked
    }
}

/// Completed wins over locked: a finished lesson stays repeatable even if a
/// prerequisite was reset.
pub fn lesson_status(lesson: &Lesson, is_completed: impl Fn(&str) -> bool) -> LessonStatus {
    if is_completed(&lesson.id) {
        LessonStatus::Completed
    } else if lesson.is_locked(&is_completed) {
        LessonStatus::Locked
    } else {
        LessonStatus::Available
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ListingEntry<'a> {
    pub lesson: &'a Lesson,
    pub status: LessonStatus,
}

#[derive(Clone, Debug)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub entries: Vec<ListingEntry<'a>>,
}

/// Groups lessons by category in display order, keeping catalog order inside
/// each group. Empty categories are left out.
pub fn group_by_category<'a>(
    lessons: &'a [Lesson],
    is_completed: impl Fn(&str) -> bool,
) -> Vec<CategoryGroup<'a>> {
    ALL_CATEGORIES
        .iter()
        .filter_map(|&category| {
            let entries: Vec<_> = lessons
                .iter()
                .filter(|l| l.category == category)
                .map(|lesson| ListingEntry {
                    lesson,
                    status: lesson_status(lesson, &is_completed),
                })
                .collect();
            (!entries.is_empty()).then_some(CategoryGroup { category, entries })
        })
        .collect()
}

/// Entries in the order the list screen shows them.
pub fn flatten<'a>(groups: &[CategoryGroup<'a>]) -> Vec<ListingEntry<'a>> {
    groups.iter().flat_map(|g| g.entries.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::lesson::LessonCatalog;

    fn lessons() -> Vec<Lesson> {
        LessonCatalog::load_embedded()
            .unwrap()
            .lessons(Locale::En)
            .to_vec()
    }

    #[test]
    fn groups_follow_category_order() {
        let lessons = lessons();
        let groups = group_by_category(&lessons, |_| false);
        let categories: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            vec![Category::Communication, Category::EServices, Category::Security]
        );
        let eservices: Vec<_> = groups[1].entries.iter().map(|e| e.lesson.id.as_str()).collect();
        assert_eq!(eservices, vec!["bankid-intro", "health-1177"]);
    }

    #[test]
    fn missing_prerequisite_locks() {
        let lessons = lessons();
        let entries = flatten(&group_by_category(&lessons, |_| false));
        let status = |id: &str| entries.iter().find(|e| e.lesson.id == id).unwrap().status;
        assert_eq!(status("sms-basics"), LessonStatus::Available);
        assert_eq!(status("bankid-intro"), LessonStatus::Available);
        assert_eq!(status("scam-awareness"), LessonStatus::Locked);
        assert_eq!(status("health-1177"), LessonStatus::Locked);
        assert!(!LessonStatus::Locked.can_open());
    }

    #[test]
    fn completing_prerequisite_unlocks() {
        let lessons = lessons();
        let done = ["sms-basics"];
        let entries = flatten(&group_by_category(&lessons, |id| done.contains(&id)));
        let status = |id: &str| entries.iter().find(|e| e.lesson.id == id).unwrap().status;
        assert_eq!(status("sms-basics"), LessonStatus::Completed);
        assert_eq!(status("scam-awareness"), LessonStatus::Available);
        assert_eq!(status("health-1177"), LessonStatus::Locked);
    }

    #[test]
    fn completed_lesson_is_never_locked() {
        let lessons = lessons();
        let scam = lessons.iter().find(|l| l.id == "scam-awareness").unwrap();
        assert_eq!(
            lesson_status(scam, |id| id == "scam-awareness"),
            LessonStatus::Completed
        );
    }
}
