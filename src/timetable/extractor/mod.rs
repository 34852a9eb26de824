pub mod decompose;
pub mod rows;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, Context};
use log::{debug, info, trace, warn};

use crate::timetable::cache::ParseCache;
use crate::timetable::error::{ExtractError, ExtractResult, MalformedReason};
use crate::timetable::types::{
    ClassRecord, ExtractOptions, Extraction, ExtractionStats, MalformedRowPolicy, Weekday,
};
use crate::utils::file_utils;

pub use decompose::{decompose, normalize_cell, Decomposed, Decomposer};
pub use rows::{classify, split_rows, unterminated_quote, RawRow, RowKind};

/// Context carried from one row to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowState {
    /// Text of the most recent program declaration
    pub current_program: String,

    /// Slot labels of the most recent header in this program section
    pub current_time_slots: Vec<String>,
}

/// Turns timetable text into class records
#[derive(Debug)]
pub struct TimetableExtractor {
    /// Configuration options for extraction
    options: ExtractOptions,

    /// Lecturer / course splitter built from the options
    decomposer: Decomposer,

    /// Optional memo of previous extractions
    cache: Option<Arc<ParseCache>>,
}

impl TimetableExtractor {
    /// Create a new extractor with the given options
    pub fn new(options: ExtractOptions) -> ExtractResult<Self> {
        let decomposer = Decomposer::new(&options.department_codes)?;
        Ok(Self {
            options,
            decomposer,
            cache: None,
        })
    }

    /// Create a new extractor with default options
    pub fn with_defaults() -> Self {
        Self {
            options: ExtractOptions::default(),
            decomposer: Decomposer::default(),
            cache: None,
        }
    }

    /// Memoize extractions in the given cache
    pub fn with_cache(mut self, cache: Arc<ParseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Extract records, consulting the cache when one is attached
    pub fn extract(&self, text: &str) -> ExtractResult<Arc<Extraction>> {
        let Some(cache) = &self.cache else {
            return self.parse(text).map(Arc::new);
        };

        let key = ParseCache::key(&self.options, text);
        if let Some(hit) = cache.get(&key) {
            debug!("Reusing cached extraction with {} records", hit.records.len());
            return Ok(hit);
        }

        let extraction = self.parse(text)?;
        Ok(cache.insert(key, extraction))
    }

    /// Read a file and extract records from it
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<Arc<Extraction>> {
        let path = path.as_ref();
        debug!("Extracting timetable from {}", path.display());

        let content = file_utils::read_text(path)?;
        if content.trim().is_empty() {
            warn!("Empty timetable file: {}", path.display());
        }

        self.extract(&content)
            .with_context(|| format!("Failed to extract timetable from {}", path.display()))
    }

    /// Single pass over the text without touching the cache
    pub fn parse(&self, text: &str) -> ExtractResult<Extraction> {
        let mut rows = split_rows(text)?;

        // The reader folds everything after an unclosed quote into the last row
        let corrupt_tail = match unterminated_quote(text) {
            Some(open_line) => rows.pop().map(|row| (row.line, open_line)),
            None => None,
        };

        let mut stats = ExtractionStats {
            total_rows: rows.len(),
            ..ExtractionStats::default()
        };
        let mut records = Vec::new();
        let mut state = RowState::default();

        for row in &rows {
            let (next, emitted) = self.step(state, row, &mut stats);
            state = next;

            match emitted {
                Ok(row_records) => records.extend(row_records),
                Err(reason) => match self.options.malformed_rows {
                    MalformedRowPolicy::Fail => {
                        warn!("Malformed row at line {}: {}", row.line, reason);
                        return Err(ExtractError::MalformedInput {
                            line: row.line,
                            reason,
                            partial: records,
                        });
                    }
                    MalformedRowPolicy::Skip => {
                        warn!("Skipping malformed row at line {}: {}", row.line, reason);
                        stats.malformed_rows += 1;
                        stats.malformed_row_lines.push(row.line);
                    }
                },
            }
        }

        if let Some((line, open_line)) = corrupt_tail {
            warn!("Unclosed quote opened on line {}", open_line);
            return Err(ExtractError::MalformedInput {
                line,
                reason: MalformedReason::UnterminatedQuote { line: open_line },
                partial: records,
            });
        }

        stats.total_records = records.len();
        info!(
            "Extracted {} records from {} rows ({} program sections)",
            stats.total_records, stats.total_rows, stats.program_rows
        );

        Ok(Extraction { records, stats })
    }

    /// Process one row, returning the context for the next row and the
    /// records this row produced.
    fn step(
        &self,
        state: RowState,
        row: &RawRow,
        stats: &mut ExtractionStats,
    ) -> (RowState, Result<Vec<ClassRecord>, MalformedReason>) {
        match classify(row, &self.options) {
            RowKind::Title => {
                stats.title_rows += 1;
                (state, Ok(Vec::new()))
            }
            RowKind::Program(program) => {
                debug!("Program section {:?} at line {}", program, row.line);
                stats.program_rows += 1;
                let next = RowState {
                    current_program: program,
                    current_time_slots: Vec::new(),
                };
                (next, Ok(Vec::new()))
            }
            RowKind::TimeHeader(slots) => {
                trace!("Time header at line {}: {:?}", row.line, slots);
                stats.header_rows += 1;
                let next = RowState {
                    current_time_slots: slots,
                    ..state
                };
                (next, Ok(Vec::new()))
            }
            RowKind::Day { day, cells } => {
                stats.day_rows += 1;
                if day.is_empty() {
                    stats.skipped_rows += 1;
                    return (state, Ok(Vec::new()));
                }
                let emitted = self.day_records(&state, &day, &cells, stats);
                (state, emitted)
            }
            RowKind::Other => {
                stats.skipped_rows += 1;
                (state, Ok(Vec::new()))
            }
        }
    }

    /// Build the records of one day row. Nothing is emitted if any cell
    /// of the row is malformed.
    fn day_records(
        &self,
        state: &RowState,
        day: &str,
        cells: &[String],
        stats: &mut ExtractionStats,
    ) -> Result<Vec<ClassRecord>, MalformedReason> {
        let day = day
            .parse::<Weekday>()
            .map_err(|_| MalformedReason::UnknownDay(day.to_string()))?;

        if state.current_time_slots.is_empty() {
            return Err(MalformedReason::MissingTimeHeader);
        }

        let mut records = Vec::new();
        let mut unspecified = 0;

        for (index, raw) in cells.iter().enumerate() {
            let entry = normalize_cell(raw);
            if entry.is_empty() {
                continue;
            }

            let time_slot = state
                .current_time_slots
                .get(index)
                .ok_or(MalformedReason::SlotOutOfRange {
                    index,
                    slots: state.current_time_slots.len(),
                })?;
            if time_slot.is_empty() {
                return Err(MalformedReason::BlankTimeSlot { index });
            }

            let parts = self.decomposer.decompose(&entry);
            if self.options.verbose {
                debug!("{} {}: {:?} -> {:?}", day, time_slot, entry, parts);
            }

            let lecturer = parts.lecturer.unwrap_or_else(|| {
                unspecified += 1;
                self.options.unspecified_lecturer.clone()
            });

            records.push(ClassRecord {
                program: state.current_program.clone(),
                day,
                time_slot: time_slot.clone(),
                lecturer,
                course_code: parts.course_code,
                course_name: parts.course_name,
            });
        }

        stats.unspecified_lecturers += unspecified;
        Ok(records)
    }
}
