pub mod config;
pub mod timetable;
pub mod utils;

// Re-export main types and functions for easier access
pub use timetable::types::{ClassRecord, Weekday, ExtractOptions, Extraction, ExtractionStats, MalformedRowPolicy};
pub use timetable::error::{ExtractError, ExtractResult, MalformedReason};
pub use timetable::extractor::TimetableExtractor;
pub use timetable::cache::ParseCache;
pub use timetable::summary::TimetableSummary;

// Re-export utility functions
pub use utils::file_utils;
