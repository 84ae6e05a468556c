//! Batch analytics: pure functions over an immutable outcome list.
//!
//! Nothing here is incrementally maintained; every call recomputes from the
//! full record set, which is bounded by one grading batch.

use std::collections::BTreeMap;

use batchmark_webclient::{BatchJob, OutcomeRecord, RecordStatus};
use strum::IntoEnumIterator;

/// Letter grade derived from a percentage by fixed thresholds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
pub enum GradeBucket {
    A,
    B,
    C,
    D,
    F,
}

impl GradeBucket {
    pub fn from_percentage(percentage: f64) -> Self {
        use GradeBucket::*;
        if percentage >= 90.0 {
            A
        } else if percentage >= 80.0 {
            B
        } else if percentage >= 70.0 {
            C
        } else if percentage >= 60.0 {
            D
        } else {
            F
        }
    }

    pub const fn range_label(&self) -> &'static str {
        use GradeBucket::*;
        match self {
            A => "90-100%",
            B => "80-89%",
            C => "70-79%",
            D => "60-69%",
            F => "<60%",
        }
    }
}

/// Count per bucket. All five buckets are always present, zero or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeDistribution {
    counts: BTreeMap<GradeBucket, usize>,
}

impl GradeDistribution {
    fn empty() -> Self {
        Self {
            counts: GradeBucket::iter().map(|b| (b, 0)).collect(),
        }
    }

    pub fn count(&self, bucket: GradeBucket) -> usize {
        self.counts[&bucket]
    }

    pub fn iter(&self) -> impl Iterator<Item = (GradeBucket, usize)> + '_ {
        self.counts.iter().map(|(&b, &n)| (b, n))
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }
}

/// Bucket every graded record that carries a percentage. Records that are
/// not graded, or graded without a percentage, are excluded rather than
/// counted as F.
pub fn grade_distribution(records: &[OutcomeRecord]) -> GradeDistribution {
    let mut dist = GradeDistribution::empty();
    for record in records {
        if record.status != RecordStatus::Graded {
            continue;
        }
        let Some(percentage) = record.percentage else {
            continue;
        };
        *dist.counts.get_mut(&GradeBucket::from_percentage(percentage)).unwrap() += 1;
    }
    dist
}

/// Message a record is classified under when it has no error message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

type Predicate = fn(&str) -> bool;

/// Ordered keyword rules mapping an error message onto a category.
/// Matching is case-sensitive substring search, first rule wins, and
/// unmatched messages land in the fallback category. Categories can be
/// extended without touching the aggregation below.
pub struct ErrorClassifier {
    rules: Vec<(&'static str, Predicate)>,
    fallback: &'static str,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self {
            rules: vec![
                ("JSON Parsing Error", |m| {
                    m.contains("JSON") || m.contains("parse")
                }),
                ("Compilation Error", |m| {
                    m.contains("compilation") || m.contains("compile")
                }),
                ("Processing Timeout", |m| m.contains("timeout")),
            ],
            fallback: "Other Error",
        }
    }
}

impl ErrorClassifier {
    pub fn new(rules: Vec<(&'static str, Predicate)>, fallback: &'static str) -> Self {
        Self { rules, fallback }
    }

    pub fn classify(&self, message: Option<&str>) -> &'static str {
        let message = message.unwrap_or(UNKNOWN_ERROR_MESSAGE);
        self.rules
            .iter()
            .find(|(_, matches)| matches(message))
            .map(|(category, _)| *category)
            .unwrap_or(self.fallback)
    }
}

/// Category -> occurrence count over errored records. Categories with zero
/// occurrences do not appear.
pub fn error_taxonomy(
    records: &[OutcomeRecord],
    classifier: &ErrorClassifier,
) -> BTreeMap<&'static str, usize> {
    records
        .iter()
        .filter(|r| r.status == RecordStatus::Error)
        .fold(BTreeMap::new(), |mut counts, record| {
            let category = classifier.classify(record.error_message.as_deref());
            *counts.entry(category).or_default() += 1;
            counts
        })
}

// Criterion floors below which a submission counts as weak in that area,
// and the share of the graded population at which an area gets flagged.
// Absolute values against the default rubric (40/25/20/15 maxima).
pub const CORRECTNESS_FLOOR: i64 = 15;
pub const STYLE_FLOOR: i64 = 15;
pub const DOCUMENTATION_FLOOR: i64 = 8;
pub const FLAG_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum IssueArea {
    #[strum(serialize = "algorithm/logic")]
    Logic,
    #[strum(serialize = "code style")]
    Style,
    #[strum(serialize = "documentation")]
    Documentation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImprovementFlag {
    pub area: IssueArea,
    /// Rounded share of graded-with-detail submissions that are weak here.
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackSummary {
    /// No graded record carried grading details.
    NothingToAnalyze,
    /// No area was weak in more than [`FLAG_RATIO`] of the population.
    StrongPerformance,
    NeedsAttention(Vec<ImprovementFlag>),
}

/// Population-threshold heuristic over the per-criterion scores.
pub fn feedback_summary(records: &[OutcomeRecord]) -> FeedbackSummary {
    let details: Vec<_> = records
        .iter()
        .filter(|r| r.status == RecordStatus::Graded)
        .filter_map(|r| r.grading_details.as_ref())
        .collect();

    if details.is_empty() {
        return FeedbackSummary::NothingToAnalyze;
    }

    let weak_counts = [
        (IssueArea::Logic, details.iter().filter(|d| d.correctness_score < CORRECTNESS_FLOOR).count()),
        (IssueArea::Style, details.iter().filter(|d| d.code_style_score < STYLE_FLOOR).count()),
        (IssueArea::Documentation, details.iter().filter(|d| d.documentation_score < DOCUMENTATION_FLOOR).count()),
    ];

    let population = details.len() as f64;
    let flags: Vec<ImprovementFlag> = weak_counts
        .into_iter()
        .filter(|&(_, n)| n as f64 > population * FLAG_RATIO)
        .map(|(area, n)| ImprovementFlag {
            area,
            percent: (n as f64 / population * 100.0).round() as u32,
        })
        .collect();

    if flags.is_empty() {
        FeedbackSummary::StrongPerformance
    } else {
        FeedbackSummary::NeedsAttention(flags)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessingInsights {
    /// Mean `processing_time` over graded records that define one; 0 when
    /// none do.
    pub average_processing_time: f64,
    /// `successful_grades / total_files`, in percent; 0 for an empty job.
    pub success_rate: f64,
    /// Passed through from the job when the server reports it.
    pub compilation_success_rate: Option<f64>,
}

pub fn processing_insights(job: &BatchJob, records: &[OutcomeRecord]) -> ProcessingInsights {
    let times: Vec<f64> = records
        .iter()
        .filter(|r| r.status == RecordStatus::Graded)
        .filter_map(|r| r.grading_details.as_ref())
        .filter_map(|d| d.processing_time)
        .collect();

    let average_processing_time = if times.is_empty() {
        0.0
    } else {
        times.iter().sum::<f64>() / times.len() as f64
    };

    let success_rate = if job.total_files == 0 {
        0.0
    } else {
        job.successful_grades as f64 / job.total_files as f64 * 100.0
    };

    ProcessingInsights {
        average_processing_time,
        success_rate,
        compilation_success_rate: job.compilation_success_rate,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use batchmark_webclient::{GradingDetail, JobStatus};

    fn record(status: RecordStatus, percentage: Option<f64>) -> OutcomeRecord {
        OutcomeRecord {
            id: "r".into(),
            student_name: "John Doe".into(),
            file_name: "johnDoeLab1.cpp".into(),
            status,
            submitted_at: "2024-04-02T10:00:00Z".parse().unwrap(),
            graded_at: None,
            total_score: None,
            percentage,
            error_message: None,
            compilation_status: None,
            grading_details: None,
        }
    }

    fn errored(message: Option<&str>) -> OutcomeRecord {
        let mut r = record(RecordStatus::Error, None);
        r.error_message = message.map(str::to_owned);
        r
    }

    fn graded_with_scores(correctness: i64, style: i64, docs: i64) -> OutcomeRecord {
        let mut r = record(RecordStatus::Graded, Some(75.0));
        r.grading_details = Some(GradingDetail {
            correctness_score: correctness,
            code_style_score: style,
            efficiency_score: 15,
            documentation_score: docs,
            overall_feedback: "ok".into(),
            suggestions: String::new(),
            processing_time: Some(5.0),
            compilation_errors: vec![],
            style_warnings: vec![],
        });
        r
    }

    fn job(total_files: u32, successful: u32) -> BatchJob {
        BatchJob {
            id: "job-1".into(),
            status: JobStatus::Completed,
            assignment_name: "Lab 1".into(),
            total_files,
            processed_files: total_files,
            successful_grades: successful,
            failed_grades: total_files - successful,
            progress_percentage: 100.0,
            average_score: None,
            median_score: None,
            highest_score: None,
            lowest_score: None,
            processing_time_total: None,
            compilation_success_rate: None,
            error_message: None,
            created_at: "2024-04-02T10:00:00Z".parse().unwrap(),
            started_at: None,
            completed_at: None,
        }
    }

    #[test]
    fn bucket_thresholds_are_inclusive_at_the_top() {
        assert_eq!(GradeBucket::from_percentage(90.0), GradeBucket::A);
        assert_eq!(GradeBucket::from_percentage(89.9), GradeBucket::B);
        assert_eq!(GradeBucket::from_percentage(80.0), GradeBucket::B);
        assert_eq!(GradeBucket::from_percentage(70.0), GradeBucket::C);
        assert_eq!(GradeBucket::from_percentage(60.0), GradeBucket::D);
        assert_eq!(GradeBucket::from_percentage(59.99), GradeBucket::F);
        assert_eq!(GradeBucket::from_percentage(0.0), GradeBucket::F);
        assert_eq!(GradeBucket::from_percentage(100.0), GradeBucket::A);
    }

    #[test]
    fn bucketing_is_total_over_the_whole_range() {
        // Every percentage lands in exactly one bucket.
        for i in 0..=1000 {
            let p = i as f64 / 10.0;
            let bucket = GradeBucket::from_percentage(p);
            assert!(GradeBucket::iter().any(|b| b == bucket));
        }
    }

    #[test]
    fn distribution_counts_only_graded_records_with_percentage() {
        let records = vec![
            record(RecordStatus::Graded, Some(95.0)),
            record(RecordStatus::Graded, Some(85.0)),
            record(RecordStatus::Graded, Some(85.5)),
            record(RecordStatus::Graded, Some(42.0)),
            // excluded: not graded / no percentage
            record(RecordStatus::Pending, Some(99.0)),
            record(RecordStatus::Error, None),
            record(RecordStatus::Graded, None),
        ];

        let dist = grade_distribution(&records);
        assert_eq!(dist.count(GradeBucket::A), 1);
        assert_eq!(dist.count(GradeBucket::B), 2);
        assert_eq!(dist.count(GradeBucket::C), 0);
        assert_eq!(dist.count(GradeBucket::D), 0);
        assert_eq!(dist.count(GradeBucket::F), 1);
        assert_eq!(dist.total(), 4);
        assert_eq!(dist.max_count(), 2);
    }

    #[test]
    fn classifier_matches_in_priority_order() {
        let c = ErrorClassifier::default();
        assert_eq!(
            c.classify(Some("JSON parse error at line 4")),
            "JSON Parsing Error"
        );
        assert_eq!(c.classify(Some("failed to parse output")), "JSON Parsing Error");
        assert_eq!(c.classify(Some("compilation failed")), "Compilation Error");
        assert_eq!(c.classify(Some("could not compile main.cpp")), "Compilation Error");
        assert_eq!(c.classify(Some("grading timeout after 120s")), "Processing Timeout");
        // "parse" outranks "compile" outranks "timeout"
        assert_eq!(
            c.classify(Some("parse of compile log hit timeout")),
            "JSON Parsing Error"
        );
        // keyword match is case-sensitive
        assert_eq!(c.classify(Some("Json went wrong")), "Other Error");
        assert_eq!(c.classify(Some("disk full")), "Other Error");
        assert_eq!(c.classify(None), "Other Error");
    }

    #[test]
    fn taxonomy_counts_errored_records_and_omits_empty_categories() {
        let records = vec![
            errored(Some("JSON parse error at line 4")),
            errored(Some("compilation failed: missing semicolon")),
            errored(Some("compile error")),
            errored(None),
            // graded records never enter the taxonomy
            record(RecordStatus::Graded, Some(90.0)),
        ];

        let taxonomy = error_taxonomy(&records, &ErrorClassifier::default());
        assert_eq!(taxonomy["JSON Parsing Error"], 1);
        assert_eq!(taxonomy["Compilation Error"], 2);
        assert_eq!(taxonomy["Other Error"], 1);
        assert!(!taxonomy.contains_key("Processing Timeout"));
    }

    #[test]
    fn feedback_flags_areas_above_the_population_threshold() {
        // 10 graded-with-detail records, 4 weak in correctness (40% > 30%),
        // 2 weak in style (20%), none weak in docs.
        let mut records: Vec<_> = (0..4).map(|_| graded_with_scores(10, 20, 12)).collect();
        records.extend((0..2).map(|_| graded_with_scores(30, 10, 12)));
        records.extend((0..4).map(|_| graded_with_scores(30, 20, 12)));

        match feedback_summary(&records) {
            FeedbackSummary::NeedsAttention(flags) => {
                assert_eq!(flags.len(), 1);
                assert_eq!(flags[0].area, IssueArea::Logic);
                assert_eq!(flags[0].percent, 40);
            }
            other => panic!("expected flags, got {:?}", other),
        }
    }

    #[test]
    fn feedback_reports_strong_performance_when_nothing_exceeds_threshold() {
        // 3/10 weak is exactly 30%: not strictly above, not flagged.
        let mut records: Vec<_> = (0..3).map(|_| graded_with_scores(10, 20, 12)).collect();
        records.extend((0..7).map(|_| graded_with_scores(30, 20, 12)));
        assert_eq!(feedback_summary(&records), FeedbackSummary::StrongPerformance);
    }

    #[test]
    fn feedback_with_no_details_is_nothing_to_analyze() {
        let records = vec![
            record(RecordStatus::Graded, Some(90.0)),
            record(RecordStatus::Error, None),
        ];
        assert_eq!(feedback_summary(&records), FeedbackSummary::NothingToAnalyze);
        assert_eq!(feedback_summary(&[]), FeedbackSummary::NothingToAnalyze);
    }

    #[test]
    fn insights_success_rate_from_job_counters() {
        let insights = processing_insights(&job(10, 7), &[]);
        assert_eq!(insights.success_rate, 70.0);
        assert_eq!(insights.average_processing_time, 0.0);

        let empty = processing_insights(&job(0, 0), &[]);
        assert_eq!(empty.success_rate, 0.0);
    }

    #[test]
    fn insights_average_over_defined_processing_times() {
        let mut with_time = graded_with_scores(30, 20, 12);
        with_time.grading_details.as_mut().unwrap().processing_time = Some(4.0);
        let mut longer = graded_with_scores(30, 20, 12);
        longer.grading_details.as_mut().unwrap().processing_time = Some(8.0);
        let mut missing = graded_with_scores(30, 20, 12);
        missing.grading_details.as_mut().unwrap().processing_time = None;

        let insights = processing_insights(&job(3, 3), &[with_time, longer, missing]);
        assert_eq!(insights.average_processing_time, 6.0);
    }

    #[test]
    fn empty_batch_yields_empty_analytics() {
        let dist = grade_distribution(&[]);
        for bucket in GradeBucket::iter() {
            assert_eq!(dist.count(bucket), 0);
        }
        assert!(error_taxonomy(&[], &ErrorClassifier::default()).is_empty());
        assert_eq!(feedback_summary(&[]), FeedbackSummary::NothingToAnalyze);
    }
}
