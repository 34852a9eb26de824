use csv::{ReaderBuilder, StringRecord, Trim};
use log::trace;

use crate::timetable::error::ExtractResult;
use crate::timetable::types::ExtractOptions;

/// One logical row of timetable text.
/// Quoted cells may span several physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    /// Physical line reported by the reader for the row (1-based)
    pub line: u64,

    /// Fields with enclosing quotes already removed
    pub fields: Vec<String>,
}

impl RawRow {
    /// The row rejoined with its delimiter, used for marker detection
    pub fn text(&self) -> String {
        self.fields.join(",")
    }
}

/// Category of a logical row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Banner row, ignored
    Title,

    /// Declares the program section for the rows that follow
    Program(String),

    /// Declares the ordered time-slot labels
    TimeHeader(Vec<String>),

    /// Day name and its cells, positionally aligned with the header
    Day { day: String, cells: Vec<String> },

    /// Anything else (single-field rows that carry no data)
    Other,
}

/// Split text into logical rows.
///
/// Commas and line breaks inside double quotes stay part of the field.
/// Blank lines produce no row; rows may have different field counts.
pub fn split_rows(text: &str) -> ExtractResult<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    let mut record = StringRecord::new();

    while reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let fields = record.iter().map(str::to_string).collect::<Vec<_>>();
        trace!("Row at line {} has {} fields", line, fields.len());
        rows.push(RawRow { line, fields });
    }

    Ok(rows)
}

/// Line on which a quoted field is opened but never closed.
///
/// Follows the reader's quoting rules: a quote only opens a field when it is
/// the field's first character, and `""` inside a quoted field is an escape.
/// The reader would fold every later line into that field.
pub fn unterminated_quote(text: &str) -> Option<u64> {
    let mut line = 1;
    let mut at_field_start = true;
    let mut open: Option<u64> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if open.is_some() {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                }
                '"' => open = None,
                '\n' => line += 1,
                _ => {}
            }
            continue;
        }

        match c {
            '"' if at_field_start => {
                open = Some(line);
                at_field_start = false;
            }
            ',' | '\r' => at_field_start = true,
            '\n' => {
                line += 1;
                at_field_start = true;
            }
            _ => at_field_start = false,
        }
    }

    open
}

/// Classify a row; heuristics are applied in order title, program,
/// header, day.
pub fn classify(row: &RawRow, options: &ExtractOptions) -> RowKind {
    let text = row.text();

    if !options.title_marker.is_empty() && text.contains(&options.title_marker) {
        return RowKind::Title;
    }

    if options
        .program_markers
        .iter()
        .any(|marker| !marker.is_empty() && text.contains(marker.as_str()))
    {
        return RowKind::Program(text.trim().to_string());
    }

    if !options.header_marker.is_empty() && text.contains(&options.header_marker) {
        let mut slots = row
            .fields
            .iter()
            .map(|field| field.trim().to_string())
            .collect::<Vec<_>>();
        if slots.first().is_some_and(|first| first.is_empty()) {
            slots.remove(0);
        }
        // trailing delimiters from spreadsheet exports
        while slots.last().is_some_and(|last| last.is_empty()) {
            slots.pop();
        }
        return RowKind::TimeHeader(slots);
    }

    if row.fields.len() > 1 {
        return RowKind::Day {
            day: row.fields[0].trim().to_string(),
            cells: row.fields[1..].to_vec(),
        };
    }

    RowKind::Other
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(fields: &[&str]) -> RawRow {
        RawRow {
            line: 1,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_quoted_line_break_stays_in_one_row() {
        let text = "Monday,A,\"B\nC\",D\nTuesday,E,,\n";
        let rows = split_rows(text).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields, vec!["Monday", "A", "B\nC", "D"]);
        assert_eq!(rows[0].line, 1);
        assert_eq!(rows[1].fields, vec!["Tuesday", "E", "", ""]);
        assert!(rows[1].line > rows[0].line);
    }

    #[test]
    fn test_quoted_comma_stays_in_one_field() {
        let rows = split_rows("Friday,\"X, Y\",Z").unwrap();
        assert_eq!(rows[0].fields, vec!["Friday", "X, Y", "Z"]);
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let rows = split_rows("A\n\n\nB\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].fields, vec!["B"]);
    }

    #[test]
    fn test_unterminated_quote_is_found() {
        assert_eq!(unterminated_quote("P TERM 1\n,0800-1100\nMonday,\"A EEE 1 X\nTuesday,B\n"), Some(3));
        assert_eq!(unterminated_quote("Monday,\"A\nB\",\"C \"\"x\"\" D\"\n"), None);
        assert_eq!(unterminated_quote("Monday,He said \"hi,B\n"), None);
        assert_eq!(unterminated_quote(""), None);
    }

    #[test]
    fn test_header_drops_trailing_empty_labels() {
        let options = ExtractOptions::default();
        assert_eq!(
            classify(&row(&["", "0800-1100", "1100-1400", "", " "]), &options),
            RowKind::TimeHeader(vec!["0800-1100".to_string(), "1100-1400".to_string()])
        );
    }

    #[test]
    fn test_classify_rows() {
        let options = ExtractOptions::default();

        assert_eq!(
            classify(&row(&["NAIROBI CITY CAMPUS DRAFT TEACHING TIMETABLE"]), &options),
            RowKind::Title
        );
        assert_eq!(
            classify(&row(&["  ARTISAN CEE TERM 2 "]), &options),
            RowKind::Program("ARTISAN CEE TERM 2".to_string())
        );
        assert_eq!(
            classify(&row(&["", "0800-1100", "1100-1400", " 1400-1700"]), &options),
            RowKind::TimeHeader(vec![
                "0800-1100".to_string(),
                "1100-1400".to_string(),
                "1400-1700".to_string(),
            ])
        );
        assert_eq!(
            classify(&row(&[" Monday ", "", "X"]), &options),
            RowKind::Day {
                day: "Monday".to_string(),
                cells: vec!["".to_string(), "X".to_string()],
            }
        );
        assert_eq!(classify(&row(&["just a note"]), &options), RowKind::Other);
    }

    #[test]
    fn test_title_wins_over_program_marker() {
        let options = ExtractOptions::default();
        let banner = row(&["DIPLOMA DRAFT TEACHING TIMETABLE"]);
        assert_eq!(classify(&banner, &options), RowKind::Title);
    }
}
