use reqwest::StatusCode;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid submission: {reason}")]
    Validation { reason: &'static str },

    #[error("No such batch job '{job_id}'")]
    NotFound { job_id: String },

    #[error("Unexpected response shape while decoding {what}")]
    DataShape {
        what: &'static str,

        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected response code '{got}' (expected '{expected}') while requesting to {requested_url}")]
    UnexpectedResponseCode {
        got: StatusCode,
        expected: StatusCode,
        requested_url: String,
    },

    #[error("Failed to build server URL from '{base}' (path: {path})")]
    InvalidBaseUrl { base: String, path: String },

    #[error("Http error: {0}")]
    Transport(#[from] reqwest::Error),
}
