use std::collections::HashMap;

use serde::Serialize;

use crate::timetable::types::{ClassRecord, Weekday};

/// Number of classes taught by one lecturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LecturerCount {
    #[serde(rename = "Lecturer")]
    pub lecturer: String,

    #[serde(rename = "Number of Classes")]
    pub classes: usize,
}

/// Number of classes scheduled on one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    #[serde(rename = "Day")]
    pub day: Weekday,

    #[serde(rename = "Number of Classes")]
    pub classes: usize,
}

/// Count records per lecturer, highest count first, ties by name
pub fn lecturer_counts(records: &[ClassRecord]) -> Vec<LecturerCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.lecturer.as_str()).or_insert(0) += 1;
    }

    let mut counts = counts
        .into_iter()
        .map(|(lecturer, classes)| LecturerCount {
            lecturer: lecturer.to_string(),
            classes,
        })
        .collect::<Vec<_>>();
    counts.sort_by(|a, b| b.classes.cmp(&a.classes).then_with(|| a.lecturer.cmp(&b.lecturer)));
    counts
}

/// Count records per weekday; always five entries, Monday to Friday
pub fn day_counts(records: &[ClassRecord]) -> Vec<DayCount> {
    Weekday::ALL
        .iter()
        .map(|&day| DayCount {
            day,
            classes: records.iter().filter(|record| record.day == day).count(),
        })
        .collect()
}
