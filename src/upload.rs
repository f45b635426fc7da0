//! Posting a job to the Coveralls API.

use crate::errors::{Error, Result};
use crate::job::Job;
use serde::Deserialize;
use std::time::Duration;

const JOBS_PATH: &str = "/api/v1/jobs";

/// Body returned by the Coveralls API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub error: bool,
}

/// Blocking HTTP client bound to one API endpoint.
pub struct Uploader {
    client: reqwest::blocking::Client,
    jobs_url: String,
}

impl Uploader {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("coverpush/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            jobs_url: jobs_url(endpoint),
        })
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }

    /// Submit `job` as the `json` form field.
    ///
    /// # Errors
    ///
    /// [`Error::Http`] for transport failures, [`Error::Upload`] when the
    /// service answers with a non-success status or `error: true`.
    pub fn submit(&self, job: &Job) -> Result<Response> {
        let payload = job.to_json()?;
        log::info!(
            "Posting {} source files to {}",
            job.source_files.len(),
            self.jobs_url
        );

        let res = self
            .client
            .post(&self.jobs_url)
            .form(&[("json", payload.as_str())])
            .send()?;
        let status = res.status();
        let body = res.text()?;
        interpret_response(status.as_u16(), &body)
    }
}

fn jobs_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), JOBS_PATH)
}

/// Decide whether a response body means success.
fn interpret_response(status: u16, body: &str) -> Result<Response> {
    let parsed: Option<Response> = serde_json::from_str(body).ok();

    match parsed {
        Some(response) if response.error => Err(Error::Upload(response.message)),
        Some(response) if (200..300).contains(&status) => Ok(response),
        Some(response) if !response.message.is_empty() => Err(Error::Upload(format!(
            "HTTP {status}: {}",
            response.message
        ))),
        _ => Err(Error::Upload(format!("HTTP {status}: {}", body.trim()))),
    }
}
