use crate::error::*;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use reqwest::Url;

pub type UtcDateTime = chrono::DateTime<chrono::Utc>;

/// Lifecycle of one server-side batch grading job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// No further transition occurs from a terminal status.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Per-file grading state, as reported by the server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Grading,
    Graded,
    Error,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CompilationStatus {
    Success,
    Warning,
    Error,
}

/// Criteria breakdown attached to a graded record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingDetail {
    pub correctness_score: i64,
    pub code_style_score: i64,
    pub efficiency_score: i64,
    pub documentation_score: i64,
    pub overall_feedback: String,
    #[serde(default)]
    pub suggestions: String,
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub compilation_errors: Vec<String>,
    #[serde(default)]
    pub style_warnings: Vec<String>,
}

/// One per submitted file. Created at batch-submission time and mutated only
/// by the server-side grading pipeline; the client replaces whole lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub id: String,
    pub student_name: String,
    pub file_name: String,
    pub status: RecordStatus,
    pub submitted_at: UtcDateTime,
    #[serde(default)]
    pub graded_at: Option<UtcDateTime>,
    #[serde(default)]
    pub total_score: Option<i64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub compilation_status: Option<CompilationStatus>,
    #[serde(default)]
    pub grading_details: Option<GradingDetail>,
}

/// Server-owned job snapshot. Replaced wholesale on each status fetch,
/// never merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub id: String,
    pub status: JobStatus,
    pub assignment_name: String,
    pub total_files: u32,
    pub processed_files: u32,
    pub successful_grades: u32,
    pub failed_grades: u32,
    pub progress_percentage: f32,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub median_score: Option<f64>,
    #[serde(default)]
    pub highest_score: Option<f64>,
    #[serde(default)]
    pub lowest_score: Option<f64>,
    #[serde(default)]
    pub processing_time_total: Option<f64>,
    #[serde(default)]
    pub compilation_success_rate: Option<f64>,
    #[serde(default)]
    pub error_message: Option<String>,
    pub created_at: UtcDateTime,
    #[serde(default)]
    pub started_at: Option<UtcDateTime>,
    #[serde(default)]
    pub completed_at: Option<UtcDateTime>,
}

/// Response of a batch submission. The server may reject a subset of the
/// uploaded files; `valid_files` below the submitted count is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReceipt {
    pub batch_job_id: String,
    pub valid_files: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorSummary {
    #[serde(default)]
    pub json_parse_errors: u32,
    #[serde(default)]
    pub compilation_errors: u32,
    #[serde(default)]
    pub timeout_errors: u32,
    #[serde(default)]
    pub other_errors: u32,
}

/// Full results payload, fetched once after the poller observes a terminal
/// job status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    pub batch_job: BatchJob,
    pub results: Vec<OutcomeRecord>,
    #[serde(default)]
    pub error_summary: Option<ErrorSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub max_score: i64,
}

/// An in-memory file staged for batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

/// Some list endpoints answer with a bare JSON array, others with a
/// paginated `{ "results": [...] }` envelope. Both shapes are accepted
/// here, once, instead of being coerced at every consumer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybePaginated<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> MaybePaginated<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            MaybePaginated::Plain(v) => v,
            MaybePaginated::Paginated { results } => results,
        }
    }
}

/// The single typed-decode boundary: every external payload passes through
/// here and a shape mismatch fails fast instead of defaulting downstream.
pub fn decode_body<T: DeserializeOwned>(body: &str, what: &'static str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| Error::DataShape { what, source })
}

#[async_trait]
pub trait Client: Send + Sync {
    async fn submit_batch(
        &self,
        files: &[SubmissionFile],
        assignment_id: &str,
    ) -> Result<BatchReceipt>;

    async fn fetch_status(&self, job_id: &str) -> Result<BatchJob>;

    async fn fetch_results(&self, job_id: &str) -> Result<BatchResults>;

    async fn list_batches(&self) -> Result<Vec<BatchJob>>;

    async fn list_assignments(&self) -> Result<Vec<Assignment>>;
}
