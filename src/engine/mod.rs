pub mod listing;
pub mod summary;

pub use listing::{CategoryGroup, LessonStatus, ListingEntry};
pub use summary::{Badge, ProgressSummary};
