use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};

/// A teaching day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All teaching days in calendar order
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// English label used in the source text and in output
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Weekday::ALL
            .iter()
            .copied()
            .find(|day| day.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("not a teaching day: {:?}", trimmed))
    }
}

/// One scheduled class occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Program/term section active when the record was produced
    #[serde(rename = "Program")]
    pub program: String,

    #[serde(rename = "Day")]
    pub day: Weekday,

    /// Time range label taken from the section's header row
    #[serde(rename = "Time")]
    pub time_slot: String,

    /// Lecturer name, or the configured sentinel when none was found
    #[serde(rename = "Lecturer")]
    pub lecturer: String,

    #[serde(rename = "Course Code")]
    pub course_code: String,

    #[serde(rename = "Course Name")]
    pub course_name: String,
}

/// What to do with a row that cannot be aligned with a time header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Stop and return `ExtractError::MalformedInput`
    #[default]
    Fail,
    /// Drop the row and note it in the stats
    Skip,
}

/// Configuration options for timetable extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Banner substring identifying the title row
    pub title_marker: String,

    /// Substrings identifying a program/term declaration row
    pub program_markers: Vec<String>,

    /// Slot label identifying a time-header row
    pub header_marker: String,

    /// Lecturer value used when an entry has no recognizable lecturer
    pub unspecified_lecturer: String,

    /// Department codes accepted in a course designator.
    /// Empty means any run of two or more capital letters.
    pub department_codes: Vec<String>,

    /// Handling of day rows that cannot be aligned with a header
    pub malformed_rows: MalformedRowPolicy,

    /// Whether to log every decomposed entry
    pub verbose: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            title_marker: "DRAFT TEACHING TIMETABLE".to_string(),
            program_markers: vec!["TERM".to_string(), "DIPLOMA".to_string()],
            header_marker: "0800-1100".to_string(),
            unspecified_lecturer: "Not specified".to_string(),
            department_codes: Vec::new(),
            malformed_rows: MalformedRowPolicy::Fail,
            verbose: false,
        }
    }
}

impl ExtractOptions {
    /// Stable text form of every option that affects extraction output
    pub fn fingerprint(&self) -> String {
        format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{:?}",
            self.title_marker,
            self.program_markers.join("\u{1e}"),
            self.header_marker,
            self.unspecified_lecturer,
            self.department_codes.join("\u{1e}"),
            self.malformed_rows,
        )
    }
}

/// Statistics about a single extraction pass
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Logical rows read (quoted line breaks do not start a row)
    pub total_rows: usize,

    pub title_rows: usize,

    pub program_rows: usize,

    pub header_rows: usize,

    /// Rows treated as day rows, skipped ones included
    pub day_rows: usize,

    /// Rows dropped because their first field was blank or they carried no data
    pub skipped_rows: usize,

    /// Number of malformed rows dropped under `MalformedRowPolicy::Skip`
    pub malformed_rows: usize,

    /// Source line numbers of the dropped malformed rows
    pub malformed_row_lines: Vec<u64>,

    /// Records emitted
    pub total_records: usize,

    /// Entries that fell back to the unspecified lecturer
    pub unspecified_lecturers: usize,
}

/// Result of an extraction pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Records in source encounter order
    pub records: Vec<ClassRecord>,

    /// Statistics about the pass
    pub stats: ExtractionStats,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
