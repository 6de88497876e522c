pub mod json_store;
pub mod preferences;
pub mod progress;
pub mod schema;
pub mod support_gate;

pub use json_store::JsonStore;
pub use preferences::{FontSize, Preferences};
pub use progress::ProgressStore;
pub use support_gate::SupportGate;
