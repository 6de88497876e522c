pub mod runner;
pub mod timer;
pub mod widgets;

pub use runner::{LessonRunner, RunnerError, RunnerState, StepChange};
