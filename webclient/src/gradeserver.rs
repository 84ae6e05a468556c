use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::{error::*, model::*};

/// Client for the grading server's REST surface.
///
/// The bearer token is plain constructor state instead of an ambient
/// interceptor, so the polling and aggregation layers can be driven by any
/// `Client` impl in tests.
pub struct GradeServerClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

const EP_BATCH_UPLOAD: &str = "submissions/batch-upload/";
const EP_BATCH_LIST: &str = "submissions/batch/";
const EP_ASSIGNMENTS: &str = "submissions/assignments/";

fn ep_batch_status(job_id: &str) -> String {
    format!("submissions/batch/{}/status/", job_id)
}

fn ep_batch_results(job_id: &str) -> String {
    format!("submissions/batch/{}/results/", job_id)
}

impl GradeServerClient {
    pub fn new(base_url: Url) -> Self {
        let mut base_url = base_url;
        // `Url::join` resolves relative to the parent dir unless the base
        // path ends with a slash.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }
        Self {
            http: reqwest::Client::builder().gzip(true).build().unwrap(),
            base_url,
            auth_token: None,
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|_| Error::InvalidBaseUrl {
            base: self.base_url.to_string(),
            path: path.to_owned(),
        })
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// GET + status check + typed decode. `missing_job` maps a 404 onto
    /// `Error::NotFound` for the per-job endpoints.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        what: &'static str,
        missing_job: Option<&str>,
    ) -> Result<T> {
        let url_str = url.to_string();
        log::debug!("GET {}", url_str);

        let resp = self.authorized(self.http.get(url)).send().await?;
        match (resp.status(), missing_job) {
            (StatusCode::NOT_FOUND, Some(job_id)) => {
                return Err(Error::NotFound {
                    job_id: job_id.to_owned(),
                })
            }
            (got, _) if got != StatusCode::OK => {
                return Err(Error::UnexpectedResponseCode {
                    got,
                    expected: StatusCode::OK,
                    requested_url: url_str,
                })
            }
            _ => {}
        }

        let body = resp.text().await?;
        decode_body(&body, what)
    }
}

#[async_trait]
impl Client for GradeServerClient {
    async fn submit_batch(
        &self,
        files: &[SubmissionFile],
        assignment_id: &str,
    ) -> Result<BatchReceipt> {
        if files.is_empty() {
            return Err(Error::Validation {
                reason: "no files to submit",
            });
        }
        if assignment_id.is_empty() {
            return Err(Error::Validation {
                reason: "assignment id is required",
            });
        }

        let url = self.endpoint(EP_BATCH_UPLOAD)?;
        let url_str = url.to_string();

        let mut form = Form::new().text("assignmentId", assignment_id.to_owned());
        for file in files {
            form = form.part(
                "files",
                Part::bytes(file.contents.clone()).file_name(file.file_name.clone()),
            );
        }

        log::debug!(
            "POST {} ({} files, assignment={})",
            url_str,
            files.len(),
            assignment_id
        );
        let resp = self
            .authorized(self.http.post(url))
            .multipart(form)
            .send()
            .await?;

        let got = resp.status();
        if !got.is_success() {
            return Err(Error::UnexpectedResponseCode {
                got,
                expected: StatusCode::CREATED,
                requested_url: url_str,
            });
        }

        let body = resp.text().await?;
        decode_body(&body, "batch receipt")
    }

    async fn fetch_status(&self, job_id: &str) -> Result<BatchJob> {
        let url = self.endpoint(&ep_batch_status(job_id))?;
        self.get_json(url, "batch status", Some(job_id)).await
    }

    async fn fetch_results(&self, job_id: &str) -> Result<BatchResults> {
        let url = self.endpoint(&ep_batch_results(job_id))?;
        self.get_json(url, "batch results", Some(job_id)).await
    }

    async fn list_batches(&self) -> Result<Vec<BatchJob>> {
        let url = self.endpoint(EP_BATCH_LIST)?;
        let batches: MaybePaginated<BatchJob> =
            self.get_json(url, "batch list", None).await?;
        Ok(batches.into_vec())
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        let url = self.endpoint(EP_ASSIGNMENTS)?;
        let assignments: MaybePaginated<Assignment> =
            self.get_json(url, "assignment list", None).await?;
        Ok(assignments.into_vec())
    }
}
