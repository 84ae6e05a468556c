//! Best-effort student name recovery from submission filenames, used for
//! the submit preview. The server runs the same heuristic when it creates
//! the outcome records; this is display-only on our side.

use lazy_regex::{lazy_regex, Lazy, Regex};

static RE_TRAILING_TAG: Lazy<Regex> = lazy_regex!(r"(?i)[_-]?(lab|assignment|hw)\d*$");
static RE_CAMEL_BOUNDARY: Lazy<Regex> = lazy_regex!(r"([a-z])([A-Z])");

pub const UNKNOWN_STUDENT: &str = "Unknown Student";

/// `"johnDoelab1.cpp"` -> `"John Doe"`, `"maryCalderon_Lab01.cpp"` ->
/// `"Mary Calderon"`. Falls back to [`UNKNOWN_STUDENT`] when nothing
/// name-like remains.
pub fn student_name_from_filename(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(filename);

    let name = RE_TRAILING_TAG.replace(stem, "");
    let name = RE_CAMEL_BOUNDARY.replace_all(&name, "${1} ${2}");
    let name = name.replace(['_', '-'], " ");

    let name = name
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        UNKNOWN_STUDENT.to_owned()
    } else {
        name
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn strips_assignment_tags_and_splits_camel_case() {
        assert_eq!(student_name_from_filename("johnDoelab1.cpp"), "John Doe");
        assert_eq!(
            student_name_from_filename("maryCalderon_Lab01.cpp"),
            "Mary Calderon"
        );
        assert_eq!(
            student_name_from_filename("alexisBravo-assignment1.cpp"),
            "Alexis Bravo"
        );
        assert_eq!(student_name_from_filename("sam_smith_hw3.cpp"), "Sam Smith");
    }

    #[test]
    fn falls_back_when_nothing_remains() {
        assert_eq!(student_name_from_filename("lab1.cpp"), UNKNOWN_STUDENT);
        assert_eq!(student_name_from_filename(".cpp"), UNKNOWN_STUDENT);
    }

    #[test]
    fn plain_names_are_title_cased() {
        assert_eq!(student_name_from_filename("doe.cpp"), "Doe");
        assert_eq!(student_name_from_filename("JOHN-DOE.cpp"), "John Doe");
    }
}
