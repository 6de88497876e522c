use std::collections::{HashMap, HashSet};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::i18n::{ALL_LOCALES, Locale};
use crate::lesson::model::{
    Category, Difficulty, Lesson, LocalizedText, Step, StepKind, StepWidget,
};

#[derive(Embed)]
#[folder = "assets/lessons/"]
struct LessonAssets;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no lesson catalog for locale {0}")]
    MissingLocale(Locale),
    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },
    #[error("invalid lesson catalog {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("lesson {lesson} has no steps")]
    EmptyLesson { lesson: String },
    #[error("lesson {lesson} repeats step id {step}")]
    DuplicateStep { lesson: String, step: String },
    #[error("lesson id {lesson} appears more than once in {locale}")]
    DuplicateLesson { lesson: String, locale: Locale },
    #[error("lesson {lesson} must award points and take at least a minute")]
    ZeroValue { lesson: String },
    #[error("interactive step {step} in {lesson} has no exercise widget")]
    MissingWidget { lesson: String, step: String },
    #[error("message step {step} in {lesson} has no expected answer")]
    MissingAnswer { lesson: String, step: String },
    #[error("lesson {lesson} requires unknown lesson {prerequisite}")]
    UnknownPrerequisite { lesson: String, prerequisite: String },
    #[error("lesson {lesson} has a different {field} in {locale} than in {reference}")]
    LocaleMismatch {
        lesson: String,
        field: &'static str,
        locale: Locale,
        reference: Locale,
    },
}

#[derive(Deserialize)]
struct RawCatalog {
    #[serde(default)]
    lessons: Vec<RawLesson>,
}

#[derive(Deserialize)]
struct RawLesson {
    id: String,
    title: String,
    description: String,
    category: Category,
    difficulty: Difficulty,
    duration: u32,
    points: u32,
    #[serde(default)]
    prerequisites: Vec<String>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Deserialize)]
struct RawStep {
    id: String,
    #[serde(rename = "type")]
    kind: StepKind,
    title: LocalizedText,
    content: LocalizedText,
    hint: Option<LocalizedText>,
    component: Option<ComponentTag>,
    validation: Option<RawValidation>,
}

#[derive(Clone, Copy, Deserialize)]
enum ComponentTag {
    PhoneSimulator,
    MessageComposer,
    ScamDetector,
    AppFinder,
    SupportPopup,
}

#[derive(Deserialize)]
struct RawValidation {
    correct_answer: String,
}

/// Per-locale lesson lists, correlated by lesson id.
pub struct LessonCatalog {
    lessons: HashMap<Locale, Vec<Lesson>>,
}

impl LessonCatalog {
    /// Loads the catalogs compiled into the binary. Every locale must be present.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        let mut sources = Vec::with_capacity(ALL_LOCALES.len());
        for locale in ALL_LOCALES {
            let file = format!("{}.toml", locale.code());
            let asset = LessonAssets::get(&file).ok_or(CatalogError::MissingLocale(locale))?;
            let text = std::str::from_utf8(asset.data.as_ref())
                .map_err(|_| CatalogError::Encoding { file: file.clone() })?
                .to_string();
            sources.push((locale, text));
        }
        let catalog = Self::from_sources(sources.iter().map(|(l, t)| (*l, t.as_str())))?;
        info!(
            lessons = catalog.lessons(Locale::Sv).len(),
            locales = ALL_LOCALES.len(),
            "lesson catalog loaded"
        );
        Ok(catalog)
    }

    /// Parses and validates TOML catalog sources. The first locale given is the
    /// reference the others are compared against.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (Locale, &'a str)>,
    ) -> Result<Self, CatalogError> {
        let mut lessons = HashMap::new();
        let mut order = Vec::new();
        for (locale, text) in sources {
            let parsed = parse_locale(locale, text)?;
            order.push(locale);
            lessons.insert(locale, parsed);
        }
        let catalog = Self { lessons };
        if let Some((reference, rest)) = order.split_first() {
            for locale in rest {
                catalog.check_agreement(*reference, *locale)?;
            }
        }
        Ok(catalog)
    }

    /// Lessons of `locale` in authored order. Falls back to Swedish when the
    /// locale has no catalog of its own.
    pub fn lessons(&self, locale: Locale) -> &[Lesson] {
        self.lessons
            .get(&locale)
            .or_else(|| self.lessons.get(&Locale::Sv))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn lesson(&self, locale: Locale, id: &str) -> Option<&Lesson> {
        self.lessons(locale).iter().find(|l| l.id == id)
    }

    fn check_agreement(&self, reference: Locale, locale: Locale) -> Result<(), CatalogError> {
        for lesson in self.lessons(locale) {
            let Some(base) = self.lesson(reference, &lesson.id) else {
                continue;
            };
            let mismatch = if base.points != lesson.points {
                Some("point value")
            } else if base.duration_minutes != lesson.duration_minutes {
                Some("duration")
            } else if base.category != lesson.category {
                Some("category")
            } else if base.prerequisites != lesson.prerequisites {
                Some("prerequisite list")
            } else {
                None
            };
            if let Some(field) = mismatch {
                return Err(CatalogError::LocaleMismatch {
                    lesson: lesson.id.clone(),
                    field,
                    locale,
                    reference,
                });
            }
        }
        Ok(())
    }
}

fn parse_locale(locale: Locale, text: &str) -> Result<Vec<Lesson>, CatalogError> {
    let raw: RawCatalog = toml::from_str(text).map_err(|source| CatalogError::Parse {
        file: format!("{}.toml", locale.code()),
        source,
    })?;

    let mut seen = HashSet::new();
    let mut lessons = Vec::with_capacity(raw.lessons.len());
    for raw_lesson in raw.lessons {
        if !seen.insert(raw_lesson.id.clone()) {
            return Err(CatalogError::DuplicateLesson {
                lesson: raw_lesson.id,
                locale,
            });
        }
        lessons.push(build_lesson(raw_lesson)?);
    }

    for lesson in &lessons {
        if let Some(missing) = lesson.prerequisites.iter().find(|p| !seen.contains(*p)) {
            return Err(CatalogError::UnknownPrerequisite {
                lesson: lesson.id.clone(),
                prerequisite: missing.clone(),
            });
        }
    }
    Ok(lessons)
}

fn build_lesson(raw: RawLesson) -> Result<Lesson, CatalogError> {
    if raw.steps.is_empty() {
        return Err(CatalogError::EmptyLesson { lesson: raw.id });
    }
    if raw.points == 0 || raw.duration == 0 {
        return Err(CatalogError::ZeroValue { lesson: raw.id });
    }

    let mut step_ids = HashSet::new();
    let mut steps = Vec::with_capacity(raw.steps.len());
    for raw_step in raw.steps {
        if !step_ids.insert(raw_step.id.clone()) {
            return Err(CatalogError::DuplicateStep {
                lesson: raw.id,
                step: raw_step.id,
            });
        }
        steps.push(build_step(&raw.id, raw_step)?);
    }

    Ok(Lesson {
        id: raw.id,
        title: raw.title,
        description: raw.description,
        category: raw.category,
        difficulty: raw.difficulty,
        duration_minutes: raw.duration,
        points: raw.points,
        steps,
        prerequisites: raw.prerequisites,
    })
}

fn build_step(lesson_id: &str, raw: RawStep) -> Result<Step, CatalogError> {
    let expected_answer = raw.validation.map(|v| v.correct_answer);
    let widget = match raw.component {
        None => None,
        Some(ComponentTag::PhoneSimulator) => Some(StepWidget::PhoneSimulator),
        Some(ComponentTag::ScamDetector) => Some(StepWidget::ScamDetector),
        Some(ComponentTag::AppFinder) => Some(StepWidget::AppFinder),
        Some(ComponentTag::SupportPopup) => Some(StepWidget::SupportPopup),
        Some(ComponentTag::MessageComposer) => match expected_answer.as_deref() {
            Some(expected) if !expected.trim().is_empty() => Some(StepWidget::MessageComposer {
                expected: expected.to_string(),
            }),
            _ => {
                return Err(CatalogError::MissingAnswer {
                    lesson: lesson_id.to_string(),
                    step: raw.id,
                });
            }
        },
    };

    if raw.kind == StepKind::Interactive && !widget.as_ref().is_some_and(StepWidget::is_exercise) {
        return Err(CatalogError::MissingWidget {
            lesson: lesson_id.to_string(),
            step: raw.id,
        });
    }

    Ok(Step {
        id: raw.id,
        kind: raw.kind,
        title: raw.title,
        content: raw.content,
        hint: raw.hint,
        widget,
        expected_answer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[[lessons]]
id = "a"
title = "A"
description = "first"
category = "basics"
difficulty = "beginner"
duration = 5
points = 10

[[lessons.steps]]
id = "one"
type = "instruction"
title = "One"
content = "Hello"
"#;

    fn parse(text: &str) -> Result<Vec<Lesson>, CatalogError> {
        parse_locale(Locale::En, text)
    }

    #[test]
    fn embedded_catalog_loads_for_every_locale() {
        let catalog = LessonCatalog::load_embedded().unwrap();
        for locale in ALL_LOCALES {
            let ids: Vec<_> = catalog.lessons(locale).iter().map(|l| l.id.as_str()).collect();
            assert_eq!(
                ids,
                vec!["sms-basics", "bankid-intro", "scam-awareness", "health-1177"],
                "lesson order for {locale}"
            );
        }
    }

    #[test]
    fn sms_basics_shape() {
        let catalog = LessonCatalog::load_embedded().unwrap();
        let lesson = catalog.lesson(Locale::Sv, "sms-basics").unwrap();
        assert_eq!(lesson.step_count(), 4);
        assert_eq!(lesson.points, 100);
        assert_eq!(lesson.steps[1].widget, Some(StepWidget::PhoneSimulator));
        assert_eq!(
            lesson.steps[2].widget,
            Some(StepWidget::MessageComposer {
                expected: "Hej!".into()
            })
        );
        assert_eq!(lesson.steps[3].kind, StepKind::Quiz);
    }

    #[test]
    fn support_popup_step_uses_dictionary_text() {
        let catalog = LessonCatalog::load_embedded().unwrap();
        let lesson = catalog.lesson(Locale::En, "scam-awareness").unwrap();
        let step = &lesson.steps[0];
        assert_eq!(step.widget, Some(StepWidget::SupportPopup));
        assert!(matches!(step.title, LocalizedText::Resolved(_)));
        assert!(step.has_next_action());
    }

    #[test]
    fn minimal_catalog_parses() {
        let lessons = parse(MINIMAL).unwrap();
        assert_eq!(lessons.len(), 1);
        assert!(lessons[0].prerequisites.is_empty());
        assert!(lessons[0].steps[0].hint.is_none());
    }

    #[test]
    fn rejects_duplicate_step_ids() {
        let text = format!(
            "{MINIMAL}\n[[lessons.steps]]\nid = \"one\"\ntype = \"instruction\"\ntitle = \"x\"\ncontent = \"y\"\n"
        );
        assert!(matches!(
            parse(&text),
            Err(CatalogError::DuplicateStep { ref step, .. }) if step == "one"
        ));
    }

    #[test]
    fn rejects_duplicate_lesson_ids() {
        let text = format!("{MINIMAL}\n{MINIMAL}");
        assert!(matches!(parse(&text), Err(CatalogError::DuplicateLesson { .. })));
    }

    #[test]
    fn rejects_lesson_without_steps() {
        let text = r#"
[[lessons]]
id = "empty"
title = "E"
description = ""
category = "basics"
difficulty = "beginner"
duration = 5
points = 10
"#;
        assert!(matches!(parse(text), Err(CatalogError::EmptyLesson { .. })));
    }

    #[test]
    fn rejects_zero_points() {
        let text = MINIMAL.replace("points = 10", "points = 0");
        assert!(matches!(parse(&text), Err(CatalogError::ZeroValue { .. })));
    }

    #[test]
    fn rejects_interactive_step_without_exercise() {
        let text = MINIMAL.replace("type = \"instruction\"", "type = \"interactive\"");
        assert!(matches!(parse(&text), Err(CatalogError::MissingWidget { .. })));

        let popup_only = text.replace(
            "content = \"Hello\"",
            "content = \"Hello\"\ncomponent = \"SupportPopup\"",
        );
        assert!(matches!(parse(&popup_only), Err(CatalogError::MissingWidget { .. })));
    }

    #[test]
    fn rejects_message_composer_without_answer() {
        let text = MINIMAL.replace(
            "type = \"instruction\"",
            "type = \"interactive\"\ncomponent = \"MessageComposer\"",
        );
        assert!(matches!(parse(&text), Err(CatalogError::MissingAnswer { .. })));
    }

    #[test]
    fn rejects_unknown_prerequisite() {
        let text = MINIMAL.replace("points = 10", "points = 10\nprerequisites = [\"ghost\"]");
        assert!(matches!(
            parse(&text),
            Err(CatalogError::UnknownPrerequisite { ref prerequisite, .. }) if prerequisite == "ghost"
        ));
    }

    #[test]
    fn rejects_points_disagreement_between_locales() {
        let other = MINIMAL.replace("points = 10", "points = 20");
        let result = LessonCatalog::from_sources([(Locale::Sv, MINIMAL), (Locale::En, other.as_str())]);
        assert!(matches!(
            result,
            Err(CatalogError::LocaleMismatch { field: "point value", locale: Locale::En, .. })
        ));
    }

    #[test]
    fn step_lists_may_differ_between_locales() {
        let longer = format!(
            "{MINIMAL}\n[[lessons.steps]]\nid = \"two\"\ntype = \"quiz\"\ntitle = \"Q\"\ncontent = \"?\"\n"
        );
        let catalog =
            LessonCatalog::from_sources([(Locale::Sv, MINIMAL), (Locale::En, longer.as_str())])
                .unwrap();
        assert_eq!(catalog.lesson(Locale::Sv, "a").unwrap().step_count(), 1);
        assert_eq!(catalog.lesson(Locale::En, "a").unwrap().step_count(), 2);
    }

    #[test]
    fn missing_locale_falls_back_to_swedish() {
        let catalog = LessonCatalog::from_sources([(Locale::Sv, MINIMAL)]).unwrap();
        assert_eq!(catalog.lessons(Locale::Ti).len(), 1);
        assert!(catalog.lesson(Locale::Ti, "nope").is_none());
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse("[[lessons]]\nid = 3").unwrap_err();
        assert!(err.to_string().contains("en.toml"));
    }
}
