use std::io::Write;

use anyhow::{Result, Context};

use crate::timetable::types::ClassRecord;

/// Column names of the tabular view, in order
pub const COLUMNS: [&str; 6] = [
    "Program",
    "Day",
    "Time",
    "Lecturer",
    "Course Code",
    "Course Name",
];

/// One row of the tabular view, one value per entry of `COLUMNS`
pub type TableRow = [String; 6];

impl ClassRecord {
    /// Values of this record in `COLUMNS` order
    pub fn to_row(&self) -> TableRow {
        [
            self.program.clone(),
            self.day.to_string(),
            self.time_slot.clone(),
            self.lecturer.clone(),
            self.course_code.clone(),
            self.course_name.clone(),
        ]
    }
}

/// Write records as CSV with a `COLUMNS` header row
pub fn write_csv<W: Write>(records: &[ClassRecord], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(COLUMNS)
        .context("Failed to write CSV header")?;

    for record in records {
        csv_writer
            .write_record(record.to_row())
            .context("Failed to write CSV row")?;
    }

    csv_writer.flush().context("Failed to flush CSV output")?;
    Ok(())
}
