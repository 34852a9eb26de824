use std::fmt;
use thiserror::Error;

use super::types::ClassRecord;

/// Why a day row could not be turned into records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// A day row appeared before any time-header row in its program section
    MissingTimeHeader,

    /// A non-empty cell sits past the last time-header column
    SlotOutOfRange { index: usize, slots: usize },

    /// A non-empty cell sits under a header column with no label
    BlankTimeSlot { index: usize },

    /// The first field is not a teaching day
    UnknownDay(String),

    /// A quoted field opened on `line` is never closed, so the reader
    /// folded every later line into it
    UnterminatedQuote { line: u64 },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::MissingTimeHeader => {
                write!(f, "day row appears before any time-header row")
            }
            MalformedReason::SlotOutOfRange { index, slots } => {
                write!(f, "cell {} has no time slot (header has {} slots)", index + 1, slots)
            }
            MalformedReason::BlankTimeSlot { index } => {
                write!(f, "cell {} sits under a blank time-header column", index + 1)
            }
            MalformedReason::UnknownDay(day) => write!(f, "unknown day {:?}", day),
            MalformedReason::UnterminatedQuote { line } => {
                write!(f, "quoted field opened on line {} is never closed", line)
            }
        }
    }
}

/// Errors produced while extracting records from timetable text
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A day row could not be aligned with a time header.
    /// `partial` holds the records extracted from the rows before it.
    #[error("malformed input at line {line}: {reason}")]
    MalformedInput {
        line: u64,
        reason: MalformedReason,
        partial: Vec<ClassRecord>,
    },

    /// The row reader failed
    #[error("failed to read timetable rows: {0}")]
    Csv(#[from] csv::Error),

    /// A configured department code produced an invalid pattern
    #[error("invalid course designator pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ExtractError {
    /// Records that were successfully extracted before the failure
    pub fn partial_records(&self) -> &[ClassRecord] {
        match self {
            ExtractError::MalformedInput { partial, .. } => partial,
            ExtractError::Csv(_) | ExtractError::Pattern(_) => &[],
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
