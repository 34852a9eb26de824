use once_cell::sync::Lazy;
use regex::Regex;
use log::trace;

/// Matches an all-caps lecturer prefix followed by a course designator
static ANY_DEPARTMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z\s]+)\s([A-Z]{2,}\s\d+(?:\s.*)?)$").expect("valid lecturer pattern")
});

/// Matches course info that itself starts with a designator
static ANY_DESIGNATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,}\s\d+(?:\s|$)").expect("valid designator pattern"));

/// Lecturer, course code and course name pulled out of one cell entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposed {
    /// `None` when no lecturer prefix could be matched
    pub lecturer: Option<String>,
    pub course_code: String,
    pub course_name: String,
}

/// Splits cell entries into lecturer and course parts
#[derive(Debug, Clone)]
pub struct Decomposer {
    lecturer_re: Regex,
    designator_re: Regex,
}

impl Default for Decomposer {
    fn default() -> Self {
        Self {
            lecturer_re: (*ANY_DEPARTMENT_RE).clone(),
            designator_re: (*ANY_DESIGNATOR_RE).clone(),
        }
    }
}

impl Decomposer {
    /// Create a decomposer restricted to the given department codes.
    /// An empty list accepts any department.
    pub fn new(department_codes: &[String]) -> Result<Self, regex::Error> {
        if department_codes.is_empty() {
            return Ok(Self::default());
        }

        let departments = department_codes
            .iter()
            .map(|code| regex::escape(code.trim()))
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            lecturer_re: Regex::new(&format!(
                r"^([A-Z\s]+)\s((?:{})\s\d+(?:\s.*)?)$",
                departments
            ))?,
            designator_re: Regex::new(&format!(r"^(?:{})\s\d+(?:\s|$)", departments))?,
        })
    }

    /// Decompose a normalized cell entry
    pub fn decompose(&self, entry: &str) -> Decomposed {
        let entry = entry.trim();

        let (lecturer, course_info) = match self.lecturer_re.captures(entry) {
            Some(caps) => {
                let lecturer = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
                let info = caps.get(2).map_or("", |m| m.as_str()).trim();
                (Some(lecturer).filter(|name| !name.is_empty()), info)
            }
            None => (None, entry),
        };

        if lecturer.is_none() && !self.designator_re.is_match(course_info) {
            trace!("No course designator in {:?}", entry);
            return Decomposed {
                lecturer: None,
                course_code: String::new(),
                course_name: course_info.to_string(),
            };
        }

        let (course_code, course_name) = split_course_info(course_info);
        Decomposed {
            lecturer,
            course_code,
            course_name,
        }
    }
}

/// Decompose an entry with the default decomposer.
///
/// Returns `(lecturer, course_code, course_name)`; the lecturer is `None`
/// when the entry has no all-caps name before a course designator.
pub fn decompose(entry: &str) -> (Option<String>, String, String) {
    static DEFAULT: Lazy<Decomposer> = Lazy::new(Decomposer::default);
    let parts = DEFAULT.decompose(entry);
    (parts.lecturer, parts.course_code, parts.course_name)
}

/// Split course info into at most three whitespace-separated pieces:
/// the first two form the code, the rest is the name.
fn split_course_info(info: &str) -> (String, String) {
    let mut rest = info.trim_start();
    let mut code_parts = Vec::with_capacity(2);

    for _ in 0..2 {
        if rest.is_empty() {
            break;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        code_parts.push(&rest[..end]);
        rest = rest[end..].trim_start();
    }

    (code_parts.join(" "), rest.trim_end().to_string())
}

/// Normalize a raw cell: drop quote characters, fold line breaks and
/// surrounding whitespace.
pub fn normalize_cell(raw: &str) -> String {
    let without_quotes = raw.replace('"', "");
    without_quotes
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("JOHN SMITH EEE 101 Intro Topic", Some("JOHN SMITH"), "EEE 101", "Intro Topic" ; "simple lecturer")]
    #[test_case("LECT Y MATHEMATICS EEE 624 Mathematics I", Some("LECT Y MATHEMATICS"), "EEE 624", "Mathematics I" ; "multi word lecturer")]
    #[test_case("TABITHA WANJIKU EEE 622 General Studies ST903", Some("TABITHA WANJIKU"), "EEE 622", "General Studies ST903" ; "room kept in name")]
    #[test_case("JOHN SMITH EEE 101", Some("JOHN SMITH"), "EEE 101", "" ; "no course name")]
    #[test_case("EEE 624 Mathematics I", None, "EEE 624", "Mathematics I" ; "designator without lecturer")]
    #[test_case("MISC NOTES", None, "", "MISC NOTES" ; "no designator")]
    #[test_case("Library hour", None, "", "Library hour" ; "free text")]
    fn test_decompose(entry: &str, lecturer: Option<&str>, code: &str, name: &str) {
        let (got_lecturer, got_code, got_name) = decompose(entry);
        assert_eq!(got_lecturer.as_deref(), lecturer);
        assert_eq!(got_code, code);
        assert_eq!(got_name, name);
    }

    #[test]
    fn test_lowercase_lecturer_is_not_matched() {
        let (lecturer, code, name) = decompose("John Smith EEE 101 Intro");
        assert_eq!(lecturer, None);
        assert_eq!(code, "");
        assert_eq!(name, "John Smith EEE 101 Intro");
    }

    #[test]
    fn test_lecturer_prefix_must_start_the_entry() {
        let (lecturer, code, name) = decompose("Dr JOHN EEE 101 X");
        assert_eq!(lecturer, None);
        assert_eq!(code, "");
        assert_eq!(name, "Dr JOHN EEE 101 X");
    }

    #[test]
    fn test_department_restriction() {
        let decomposer = Decomposer::new(&["EEE".to_string()]).unwrap();

        let matched = decomposer.decompose("JOHN SMITH EEE 101 Intro");
        assert_eq!(matched.lecturer.as_deref(), Some("JOHN SMITH"));

        let other = decomposer.decompose("JOHN SMITH MTH 101 Intro");
        assert_eq!(other.lecturer, None);
        assert_eq!(other.course_name, "JOHN SMITH MTH 101 Intro");
    }

    #[test]
    fn test_normalize_cell() {
        assert_eq!(
            normalize_cell("\"ABIGAIL JERUTO\nEEE 620 Electrical Installation Trade\nTheory\nST103\""),
            "ABIGAIL JERUTO EEE 620 Electrical Installation Trade Theory ST103"
        );
        assert_eq!(normalize_cell("  \"\"  "), "");
        assert_eq!(normalize_cell("  A B  "), "A B");
    }
}
