mod counts;
mod table;

pub use counts::{day_counts, lecturer_counts, DayCount, LecturerCount};
pub use table::{write_csv, TableRow, COLUMNS};

use serde::Serialize;

use crate::timetable::types::ClassRecord;

/// Aggregate views over a non-empty set of records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimetableSummary {
    /// Number of records summarized
    pub total_classes: usize,

    /// Classes per lecturer, most loaded first
    pub by_lecturer: Vec<LecturerCount>,

    /// Classes per weekday, Monday to Friday, zero-filled
    pub by_day: Vec<DayCount>,
}

impl TimetableSummary {
    /// Build the summary, or `None` when there is nothing to summarize
    pub fn build(records: &[ClassRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }

        Some(Self {
            total_classes: records.len(),
            by_lecturer: lecturer_counts(records),
            by_day: day_counts(records),
        })
    }
}
