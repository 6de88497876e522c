use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::i18n::Dictionary;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Communication,
    EServices,
    Security,
    Basics,
}

/// Display order of the lesson list.
pub const ALL_CATEGORIES: [Category; 4] = [
    Category::Communication,
    Category::EServices,
    Category::Security,
    Category::Basics,
];

impl Category {
    pub fn label_key(self) -> &'static str {
        match self {
            Category::Communication => "category.communication",
            Category::EServices => "category.e_services",
            Category::Security => "category.security",
            Category::Basics => "category.basics",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Category::Communication => "💬",
            Category::EServices => "🏛",
            Category::Security => "🛡",
            Category::Basics => "📱",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn label_key(self) -> &'static str {
        match self {
            Difficulty::Beginner => "difficulty.beginner",
            Difficulty::Intermediate => "difficulty.intermediate",
            Difficulty::Advanced => "difficulty.advanced",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Instruction,
    Interactive,
    Quiz,
}

type Resolver = Arc<dyn Fn(&Dictionary) -> String + Send + Sync>;

/// Step text: either authored per locale, or computed from the active
/// dictionary when the step is shown.
#[derive(Clone)]
pub enum LocalizedText {
    Literal(String),
    Resolved(Resolver),
}

impl LocalizedText {
    pub fn literal(text: impl Into<String>) -> Self {
        LocalizedText::Literal(text.into())
    }

    pub fn resolved(f: impl Fn(&Dictionary) -> String + Send + Sync + 'static) -> Self {
        LocalizedText::Resolved(Arc::new(f))
    }

    /// Text taken from a dictionary entry at render time.
    pub fn from_key(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::resolved(move |dict| dict.get(&key))
    }

    pub fn resolve(&self, dict: &Dictionary) -> String {
        match self {
            LocalizedText::Literal(text) => text.clone(),
            LocalizedText::Resolved(f) => f(dict),
        }
    }
}

impl fmt::Debug for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalizedText::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            LocalizedText::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

impl From<&str> for LocalizedText {
    fn from(text: &str) -> Self {
        LocalizedText::literal(text)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Literal(String),
    Key { key: String },
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawText::deserialize(deserializer)? {
            RawText::Literal(text) => LocalizedText::Literal(text),
            RawText::Key { key } => LocalizedText::from_key(key),
        })
    }
}

/// The interactive element a step embeds. Each variant carries exactly what
/// its widget needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepWidget {
    PhoneSimulator,
    MessageComposer { expected: String },
    ScamDetector,
    AppFinder,
    SupportPopup,
}

impl StepWidget {
    /// Exercises end their step themselves; the support popup does not.
    pub fn is_exercise(&self) -> bool {
        !matches!(self, StepWidget::SupportPopup)
    }
}

#[derive(Clone, Debug)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub title: LocalizedText,
    pub content: LocalizedText,
    pub hint: Option<LocalizedText>,
    pub widget: Option<StepWidget>,
    pub expected_answer: Option<String>,
}

impl Step {
    /// Interactive steps only move forward through their widget.
    pub fn has_next_action(&self) -> bool {
        self.kind != StepKind::Interactive
    }
}

#[derive(Clone, Debug)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub duration_minutes: u32,
    pub points: u32,
    pub steps: Vec<Step>,
    pub prerequisites: Vec<String>,
}

impl Lesson {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// True when some prerequisite is missing from `is_completed`.
    pub fn is_locked(&self, is_completed: impl Fn(&str) -> bool) -> bool {
        self.prerequisites.iter().any(|id| !is_completed(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    #[derive(Deserialize)]
    struct Holder {
        text: LocalizedText,
    }

    #[test]
    fn literal_and_resolved_render_the_same_way() {
        let dict = Dictionary::new(Locale::En);
        let literal = LocalizedText::literal("Support us with Swish");
        let resolved = LocalizedText::from_key("support_popup.title");
        assert_eq!(literal.resolve(&dict), resolved.resolve(&dict));
    }

    #[test]
    fn resolved_text_follows_active_dictionary() {
        let text = LocalizedText::from_key("lesson.finish");
        assert_eq!(text.resolve(&Dictionary::new(Locale::Sv)), "Avsluta");
        assert_eq!(text.resolve(&Dictionary::new(Locale::Fr)), "Terminer");
    }

    #[test]
    fn deserializes_string_as_literal_and_table_as_key() {
        let h: Holder = toml::from_str(r#"text = "Hej""#).unwrap();
        assert!(matches!(h.text, LocalizedText::Literal(ref s) if s == "Hej"));

        let h: Holder = toml::from_str(r#"text = { key = "lesson.next" }"#).unwrap();
        assert!(matches!(h.text, LocalizedText::Resolved(_)));
        assert_eq!(h.text.resolve(&Dictionary::new(Locale::En)), "Next");
    }

    #[test]
    fn lesson_locked_until_all_prerequisites_done() {
        let lesson = Lesson {
            id: "scam-awareness".into(),
            title: String::new(),
            description: String::new(),
            category: Category::Security,
            difficulty: Difficulty::Intermediate,
            duration_minutes: 20,
            points: 200,
            steps: Vec::new(),
            prerequisites: vec!["sms-basics".into()],
        };
        assert!(lesson.is_locked(|_| false));
        assert!(!lesson.is_locked(|id| id == "sms-basics"));
    }

    #[test]
    fn category_deserializes_kebab_case() {
        #[derive(Deserialize)]
        struct C {
            c: Category,
        }
        let c: C = toml::from_str(r#"c = "e-services""#).unwrap();
        assert_eq!(c.c, Category::EServices);
    }
}
