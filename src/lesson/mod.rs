pub mod catalog;
pub mod model;

pub use catalog::{CatalogError, LessonCatalog};
pub use model::{Category, Difficulty, Lesson, LocalizedText, Step, StepKind, StepWidget};
