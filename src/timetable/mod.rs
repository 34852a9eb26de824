pub mod types;
pub mod error;
pub mod cache;
pub mod extractor;
pub mod summary;

// Re-export the main API for easier access
pub use types::{ClassRecord, Weekday, ExtractOptions, Extraction, ExtractionStats, MalformedRowPolicy};
pub use error::{ExtractError, ExtractResult, MalformedReason};
pub use cache::ParseCache;
pub use extractor::{decompose, RowState, TimetableExtractor};
pub use summary::{day_counts, lecturer_counts, TimetableSummary};
