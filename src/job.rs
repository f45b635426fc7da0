//! The job payload posted to the coverage service, and CI detection.

use crate::git::GitInfo;
use crate::profile::SourceFile;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Service name used when neither the command line, the environment nor the
/// config file names one.
pub const DEFAULT_SERVICE_NAME: &str = "coverpush";

/// Coverage data from a single run of a test suite
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_token: Option<String>,
    pub service_name: String,
    pub service_job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_pull_request: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag_name: Option<String>,
    pub source_files: Vec<SourceFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<GitInfo>,
    pub run_at: DateTime<Utc>,
}

/// CI service the run was detected in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub job_id: Option<String>,
    pub number: Option<String>,
    pub pull_request: Option<String>,
}

/// Detect the CI service from environment variables.
///
/// `lookup` returns the value of a variable; empty values count as unset.
pub fn detect_service<F>(lookup: F) -> Option<ServiceInfo>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
    // Travis and Buildkite report "false" outside pull requests.
    let pr_var = |key: &str| var(key).filter(|v| v != "false");

    if let Some(job_id) = var("TRAVIS_JOB_ID") {
        return Some(ServiceInfo {
            name: "travis-ci".to_string(),
            job_id: Some(job_id),
            number: var("TRAVIS_BUILD_NUMBER"),
            pull_request: pr_var("TRAVIS_PULL_REQUEST"),
        });
    }
    if let Some(build) = var("CIRCLE_BUILD_NUM") {
        return Some(ServiceInfo {
            name: "circle-ci".to_string(),
            job_id: Some(build.clone()),
            number: Some(build),
            pull_request: var("CIRCLE_PR_NUMBER"),
        });
    }
    if var("GITHUB_ACTIONS").as_deref() == Some("true") {
        if let Some(run_id) = var("GITHUB_RUN_ID") {
            return Some(ServiceInfo {
                name: "github".to_string(),
                job_id: Some(run_id),
                number: var("GITHUB_RUN_NUMBER"),
                pull_request: var("GITHUB_REF").and_then(|r| pull_request_from_ref(&r)),
            });
        }
    }
    if let Some(number) = var("BUILDKITE_BUILD_NUMBER") {
        return Some(ServiceInfo {
            name: "buildkite".to_string(),
            job_id: var("BUILDKITE_JOB_ID").or_else(|| Some(number.clone())),
            number: Some(number),
            pull_request: pr_var("BUILDKITE_PULL_REQUEST"),
        });
    }
    if var("JENKINS_URL").is_some() {
        if let Some(number) = var("BUILD_NUMBER") {
            return Some(ServiceInfo {
                name: "jenkins".to_string(),
                job_id: Some(number.clone()),
                number: Some(number),
                pull_request: var("ghprbPullId").or_else(|| var("CHANGE_ID")),
            });
        }
    }
    None
}

/// `refs/pull/123/merge` -> `123`
fn pull_request_from_ref(git_ref: &str) -> Option<String> {
    let rest = git_ref.strip_prefix("refs/pull/")?;
    let number = rest.split('/').next()?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then(|| number.to_string())
}

/// Job-level settings gathered from the command line and config.
#[derive(Debug, Clone, Default)]
pub struct JobSettings {
    pub repo_token: Option<String>,
    /// Explicit `--service`, wins over detection
    pub service_name: Option<String>,
    /// Config file `upload.service_name`, used when nothing is detected
    pub fallback_service_name: Option<String>,
    pub job_id: Option<String>,
    pub parallel: bool,
    pub flag_name: Option<String>,
}

impl Job {
    pub fn assemble(
        settings: JobSettings,
        detected: Option<ServiceInfo>,
        source_files: Vec<SourceFile>,
        git: Option<GitInfo>,
    ) -> Self {
        let detected = detected.unwrap_or(ServiceInfo {
            name: String::new(),
            job_id: None,
            number: None,
            pull_request: None,
        });

        let service_name = settings
            .service_name
            .or_else(|| (!detected.name.is_empty()).then(|| detected.name.clone()))
            .or(settings.fallback_service_name)
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
        let service_job_id = settings
            .job_id
            .or(detected.job_id)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            repo_token: settings.repo_token.filter(|t| !t.is_empty()),
            service_name,
            service_job_id,
            service_number: detected.number,
            service_pull_request: detected.pull_request,
            parallel: settings.parallel,
            flag_name: settings.flag_name,
            source_files,
            git,
            run_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> crate::errors::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
