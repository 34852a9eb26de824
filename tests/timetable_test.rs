#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use timetable_extractor::timetable::summary::{day_counts, lecturer_counts};
    use timetable_extractor::{
        ClassRecord, ExtractError, ExtractOptions, MalformedReason, MalformedRowPolicy, ParseCache,
        TimetableExtractor, TimetableSummary, Weekday,
    };

    fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("draft_timetable.csv")
    }

    fn fixture_text() -> String {
        fs::read_to_string(fixture_path()).expect("fixture should be readable")
    }

    #[test]
    fn test_draft_timetable_extraction() -> Result<()> {
        let extractor = TimetableExtractor::with_defaults();
        let extraction = extractor.extract_file(fixture_path())?;

        assert_eq!(extraction.records.len(), 21, "Should have found 21 classes");
        assert_eq!(extraction.stats.total_rows, 22);
        assert_eq!(extraction.stats.title_rows, 1);
        assert_eq!(extraction.stats.program_rows, 3);
        assert_eq!(extraction.stats.header_rows, 3);
        assert_eq!(extraction.stats.day_rows, 15);
        assert_eq!(extraction.stats.unspecified_lecturers, 0);

        let first = &extraction.records[0];
        assert_eq!(
            first,
            &ClassRecord {
                program: "ARTISAN CEE TERM 2".to_string(),
                day: Weekday::Monday,
                time_slot: "1400-1700".to_string(),
                lecturer: "LECT Y MATHEMATICS".to_string(),
                course_code: "EEE 624".to_string(),
                course_name: "Mathematics I ST902".to_string(),
            }
        );

        let programs = extraction
            .records
            .iter()
            .map(|r| r.program.as_str())
            .fold(Vec::new(), |mut seen, program| {
                if seen.last() != Some(&program) {
                    seen.push(program);
                }
                seen
            });
        assert_eq!(programs, vec!["ARTISAN CEE TERM 2", "ARTISAN CEE TERM 3", "DIPLOMA Y2S1"]);

        Ok(())
    }

    #[test]
    fn test_multiline_cell_is_one_entry() -> Result<()> {
        let extraction = TimetableExtractor::with_defaults().parse(&fixture_text())?;

        let installation = extraction
            .records
            .iter()
            .filter(|r| r.course_code == "EEE 620")
            .collect::<Vec<_>>();

        assert_eq!(installation.len(), 3, "One entry per program section");
        for record in installation {
            assert_eq!(record.lecturer, "ABIGAIL JERUTO");
            assert_eq!(record.time_slot, "1100-1400");
            assert_eq!(record.course_name, "Electrical Installation Trade Theory ST103");
        }
        Ok(())
    }

    #[test]
    fn test_records_keep_source_order() -> Result<()> {
        let extraction = TimetableExtractor::with_defaults().parse(&fixture_text())?;
        let term2 = extraction
            .records
            .iter()
            .filter(|r| r.program == "ARTISAN CEE TERM 2")
            .map(|r| (r.day.label(), r.time_slot.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(
            term2,
            vec![
                ("Monday", "1400-1700"),
                ("Tuesday", "0800-1100"),
                ("Wednesday", "0800-1100"),
                ("Wednesday", "1100-1400"),
                ("Thursday", "1100-1400"),
                ("Thursday", "1400-1700"),
                ("Friday", "0800-1100"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_time_slots_come_from_section_header() -> Result<()> {
        let text = "PROGRAM A TERM 1\n\
            ,0800-1100,1100-1400\n\
            Monday,A EEE 1 X,B EEE 2 Y\n\
            PROGRAM B TERM 2\n\
            ,0800-1100,0900-1000,1000-1100\n\
            Monday,,,C EEE 3 Z\n";
        let extraction = TimetableExtractor::with_defaults().parse(text)?;

        let slots = extraction
            .records
            .iter()
            .map(|r| (r.program.as_str(), r.time_slot.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            slots,
            vec![
                ("PROGRAM A TERM 1", "0800-1100"),
                ("PROGRAM A TERM 1", "1100-1400"),
                ("PROGRAM B TERM 2", "1000-1100"),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_parse_is_idempotent() -> Result<()> {
        let extractor = TimetableExtractor::with_defaults();
        let text = fixture_text();

        let first = extractor.parse(&text)?;
        let second = extractor.parse(&text)?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn test_cached_and_uncached_agree() -> Result<()> {
        let text = fixture_text();
        let cache = Arc::new(ParseCache::new());
        let cached = TimetableExtractor::with_defaults().with_cache(Arc::clone(&cache));
        let uncached = TimetableExtractor::with_defaults();

        let from_cache = cached.extract(&text)?;
        let again = cached.extract(&text)?;
        let fresh = uncached.extract(&text)?;

        assert!(Arc::ptr_eq(&from_cache, &again));
        assert_eq!(*from_cache, *fresh);
        assert_eq!(cache.len(), 1);
        Ok(())
    }

    #[test]
    fn test_aggregates_over_draft_timetable() -> Result<()> {
        let extraction = TimetableExtractor::with_defaults().parse(&fixture_text())?;

        let by_lecturer = lecturer_counts(&extraction.records)
            .into_iter()
            .map(|c| (c.lecturer, c.classes))
            .collect::<HashMap<_, _>>();
        assert_eq!(by_lecturer.len(), 5);
        assert_eq!(by_lecturer["ABIGAIL JERUTO"], 6);
        assert_eq!(by_lecturer["JOSEPH MACHARIA"], 6);
        assert_eq!(by_lecturer["LECT Y MATHEMATICS"], 3);
        assert_eq!(by_lecturer["TABITHA WANJIKU"], 3);
        assert_eq!(by_lecturer["GIBSON KIPKOECH"], 3);

        let by_day = day_counts(&extraction.records)
            .into_iter()
            .map(|c| c.classes)
            .collect::<Vec<_>>();
        assert_eq!(by_day, vec![3, 4, 6, 5, 3]);

        let summary = TimetableSummary::build(&extraction.records).expect("summary for non-empty table");
        assert_eq!(summary.total_classes, 21);
        Ok(())
    }

    #[test]
    fn test_text_without_day_rows_is_empty_not_error() -> Result<()> {
        let text = "NAIROBI CITY CAMPUS DRAFT TEACHING TIMETABLE\nDIPLOMA Y1S1\n,0800-1100\n";
        let extraction = TimetableExtractor::with_defaults().parse(text)?;

        assert!(extraction.is_empty());
        assert!(TimetableSummary::build(&extraction.records).is_none());
        Ok(())
    }

    #[test]
    fn test_malformed_row_keeps_earlier_records() {
        let text = format!("{}Friday,,,,X EEE 9 Overflow\n", fixture_text());
        let err = TimetableExtractor::with_defaults().parse(&text).unwrap_err();

        match err {
            ExtractError::MalformedInput { reason, partial, .. } => {
                assert_eq!(reason, MalformedReason::SlotOutOfRange { index: 3, slots: 3 });
                assert_eq!(partial.len(), 21);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lenient_extraction_from_file() -> Result<()> {
        let temp_dir = tempdir()?;
        let path = temp_dir.path().join("timetable.csv");
        fs::write(&path, format!("Monday,X EEE 1 Y\n{}", fixture_text()))?;

        let strict = TimetableExtractor::with_defaults();
        assert!(strict.extract_file(&path).is_err());

        let lenient = TimetableExtractor::new(ExtractOptions {
            malformed_rows: MalformedRowPolicy::Skip,
            ..ExtractOptions::default()
        })?;
        let extraction = lenient.extract_file(&path)?;
        assert_eq!(extraction.records.len(), 21);
        assert_eq!(extraction.stats.malformed_rows, 1);
        Ok(())
    }
}
