//! Display view over a result set: search, filters, and ordering.
//!
//! `apply` is a pure function of `(records, FilterState)`; it is re-run in
//! full on every filter change instead of diffing, since the record set is
//! bounded by one batch.

use std::cmp::Ordering;

use batchmark_webclient::{OutcomeRecord, RecordStatus};

use crate::analytics::GradeBucket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RecordStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradeFilter {
    #[default]
    All,
    Only(GradeBucket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Score,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub status: StatusFilter,
    pub grade: GradeFilter,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl FilterState {
    fn matches(&self, record: &OutcomeRecord) -> bool {
        self.matches_search(record) && self.matches_status(record) && self.matches_grade(record)
    }

    fn matches_search(&self, record: &OutcomeRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        record.student_name.to_lowercase().contains(&needle)
            || record.file_name.to_lowercase().contains(&needle)
    }

    fn matches_status(&self, record: &OutcomeRecord) -> bool {
        match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => record.status == status,
        }
    }

    fn matches_grade(&self, record: &OutcomeRecord) -> bool {
        match self.grade {
            GradeFilter::All => true,
            // A record without a percentage never matches a letter grade.
            GradeFilter::Only(bucket) => record
                .percentage
                .map(GradeBucket::from_percentage)
                .map_or(false, |b| b == bucket),
        }
    }
}

/// Filter and order `records` for display. Stable: records comparing equal
/// keep their input order, in both sort directions.
pub fn apply<'a>(records: &'a [OutcomeRecord], filter: &FilterState) -> Vec<&'a OutcomeRecord> {
    let mut view: Vec<&OutcomeRecord> = records.iter().filter(|r| filter.matches(r)).collect();

    view.sort_by(|a, b| {
        let ord = compare(a, b, filter.sort_field);
        match filter.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    view
}

fn compare(a: &OutcomeRecord, b: &OutcomeRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => compare_ci(&a.student_name, &b.student_name),
        SortField::Score => a
            .percentage
            .unwrap_or(0.0)
            .total_cmp(&b.percentage.unwrap_or(0.0)),
        SortField::Status => compare_ci(&a.status.to_string(), &b.status.to_string()),
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(id: &str, name: &str, file: &str, status: RecordStatus, pct: Option<f64>) -> OutcomeRecord {
        OutcomeRecord {
            id: id.into(),
            student_name: name.into(),
            file_name: file.into(),
            status,
            submitted_at: "2024-04-02T10:00:00Z".parse().unwrap(),
            graded_at: None,
            total_score: None,
            percentage: pct,
            error_message: None,
            compilation_status: None,
            grading_details: None,
        }
    }

    fn sample() -> Vec<OutcomeRecord> {
        vec![
            record("1", "alice Zimmer", "aliceZimmerLab1.cpp", RecordStatus::Graded, Some(92.0)),
            record("2", "Bob Yates", "bobYatesLab1.cpp", RecordStatus::Graded, Some(85.0)),
            record("3", "Carol Xu", "carolXuLab1.cpp", RecordStatus::Error, None),
            record("4", "Dan Wu", "danWuLab1.cpp", RecordStatus::Pending, None),
            record("5", "Erin Vogel", "erinVogelLab1.cpp", RecordStatus::Graded, Some(85.0)),
        ]
    }

    fn ids<'a>(view: &[&'a OutcomeRecord]) -> Vec<&'a str> {
        view.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn default_filter_keeps_everything_sorted_by_name() {
        let records = sample();
        let view = apply(&records, &FilterState::default());
        // case-insensitive: "alice" sorts before "Bob"
        assert_eq!(ids(&view), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn search_matches_student_or_file_name_case_insensitively() {
        let records = sample();
        let filter = FilterState {
            search_term: "BOB".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&records, &filter)), ["2"]);

        // file name hit
        let filter = FilterState {
            search_term: "carolxu".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&records, &filter)), ["3"]);
    }

    #[test]
    fn filters_combine_as_a_conjunction() {
        let records = sample();
        let filter = FilterState {
            search_term: "Lab1".into(),
            status: StatusFilter::Only(RecordStatus::Graded),
            grade: GradeFilter::Only(GradeBucket::B),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&records, &filter)), ["2", "5"]);
    }

    #[test]
    fn grade_filter_agrees_with_aggregator_buckets() {
        let records = vec![
            record("hi", "A", "a.cpp", RecordStatus::Graded, Some(90.0)),
            record("lo", "B", "b.cpp", RecordStatus::Graded, Some(89.9)),
        ];
        let a_only = FilterState {
            grade: GradeFilter::Only(GradeBucket::A),
            ..Default::default()
        };
        let b_only = FilterState {
            grade: GradeFilter::Only(GradeBucket::B),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&records, &a_only)), ["hi"]);
        assert_eq!(ids(&apply(&records, &b_only)), ["lo"]);
    }

    #[test]
    fn records_without_percentage_match_all_but_never_a_letter() {
        let records = sample();
        let filter = FilterState {
            grade: GradeFilter::Only(GradeBucket::F),
            ..Default::default()
        };
        assert!(apply(&records, &filter).is_empty());

        let all = FilterState::default();
        assert_eq!(apply(&records, &all).len(), records.len());
    }

    #[test]
    fn score_sort_treats_missing_percentage_as_zero() {
        let records = sample();
        let filter = FilterState {
            sort_field: SortField::Score,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let view = apply(&records, &filter);
        // 92, 85, 85 (stable: input order among equals), then the two
        // percentage-less records as 0, again in input order.
        assert_eq!(ids(&view), ["1", "2", "5", "3", "4"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys_in_both_directions() {
        let records = vec![
            record("x", "Same Name", "x.cpp", RecordStatus::Graded, Some(70.0)),
            record("y", "Same Name", "y.cpp", RecordStatus::Graded, Some(70.0)),
            record("z", "Same Name", "z.cpp", RecordStatus::Graded, Some(70.0)),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let filter = FilterState {
                sort_order: order,
                ..Default::default()
            };
            assert_eq!(ids(&apply(&records, &filter)), ["x", "y", "z"]);
        }
    }

    #[test]
    fn applying_the_same_filter_twice_is_idempotent() {
        let records = sample();
        let filter = FilterState {
            search_term: "lab1".into(),
            sort_field: SortField::Score,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let once = ids(&apply(&records, &filter));
        let twice = ids(&apply(&records, &filter));
        assert_eq!(once, twice);
    }

    #[test]
    fn status_sort_orders_by_label() {
        let records = sample();
        let filter = FilterState {
            sort_field: SortField::Status,
            ..Default::default()
        };
        let view = apply(&records, &filter);
        // error < graded < pending, stable within a label
        assert_eq!(ids(&view), ["3", "1", "2", "5", "4"]);
    }
}
