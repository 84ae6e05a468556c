//! CSV encoding of an ordered outcome set.
//!
//! Callers pass the already filtered/sorted view when the artifact should
//! mirror what is on screen; row order is preserved as-is.

use batchmark_webclient::{OutcomeRecord, UtcDateTime};
use chrono::Local;

pub const MIME_TYPE: &str = "text/csv";

const SUMMARY_HEADERS: [&str; 7] = [
    "Student Name",
    "File Name",
    "Status",
    "Total Score",
    "Percentage",
    "Submitted At",
    "Graded At",
];

const DETAIL_HEADERS: [&str; 8] = [
    "Correctness",
    "Style",
    "Efficiency",
    "Documentation",
    "Overall Feedback",
    "Suggestions",
    "Error Message",
    "Processing Time",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportMode {
    Summary,
    Detailed,
}

impl ExportMode {
    pub fn field_count(&self) -> usize {
        match self {
            ExportMode::Summary => SUMMARY_HEADERS.len(),
            ExportMode::Detailed => SUMMARY_HEADERS.len() + DETAIL_HEADERS.len(),
        }
    }
}

/// `batch-results-<id>.csv` / `batch-results-detailed-<id>.csv`
pub fn artifact_filename(job_id: &str, mode: ExportMode) -> String {
    match mode {
        ExportMode::Summary => format!("batch-results-{}.csv", job_id),
        ExportMode::Detailed => format!("batch-results-detailed-{}.csv", job_id),
    }
}

pub fn encode(records: &[&OutcomeRecord], mode: ExportMode) -> String {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(header_row(mode));
    rows.extend(records.iter().map(|r| encode_row(r, mode)));
    rows.join("\n")
}

fn header_row(mode: ExportMode) -> String {
    let mut headers = SUMMARY_HEADERS.to_vec();
    if mode == ExportMode::Detailed {
        headers.extend(DETAIL_HEADERS);
    }
    headers.join(",")
}

fn encode_row(record: &OutcomeRecord, mode: ExportMode) -> String {
    let mut fields = vec![
        quoted(&record.student_name),
        quoted(&record.file_name),
        record.status.to_string(),
        opt_number(record.total_score.map(|n| n.to_string())),
        opt_number(record.percentage.map(fmt_f64)),
        fmt_datetime(&record.submitted_at),
        record.graded_at.as_ref().map(fmt_datetime).unwrap_or_default(),
    ];

    if mode == ExportMode::Detailed {
        let details = record.grading_details.as_ref();
        fields.extend([
            opt_number(details.map(|d| d.correctness_score.to_string())),
            opt_number(details.map(|d| d.code_style_score.to_string())),
            opt_number(details.map(|d| d.efficiency_score.to_string())),
            opt_number(details.map(|d| d.documentation_score.to_string())),
            quoted(details.map(|d| d.overall_feedback.as_str()).unwrap_or("")),
            quoted(details.map(|d| d.suggestions.as_str()).unwrap_or("")),
            quoted(record.error_message.as_deref().unwrap_or("")),
            details
                .and_then(|d| d.processing_time)
                .map(|t| quoted(&format!("{}s", fmt_f64(t))))
                .unwrap_or_default(),
        ]);
    }

    fields.join(",")
}

/// Text-bearing fields are always double-quoted; an inner quote is escaped
/// by doubling it.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn opt_number(n: Option<String>) -> String {
    n.unwrap_or_default()
}

fn fmt_f64(x: f64) -> String {
    // Display trims trailing zeros: 90.0 -> "90", 89.9 -> "89.9"
    format!("{}", x)
}

fn fmt_datetime(t: &UtcDateTime) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}
