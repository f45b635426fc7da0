use crate::config::{self, CoverpushConfig, ReadPolicy};
use crate::git::{self, GitInfo};
use crate::job::{detect_service, Job, JobSettings};
use crate::profile::{merge_profiles, parse_profile_file, parse_profiles, CoverMode, Profile};
use crate::report::{FsResolver, IgnoreFilter, ReportBuilder};
use crate::runner::TestRun;
use crate::upload::Uploader;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub struct PushConfig {
    pub work_dir: PathBuf,
    pub coverprofiles: Vec<PathBuf>,
    pub package: Option<String>,
    pub covermode: CoverMode,
    pub race: bool,
    pub test_verbose: bool,
    pub test_args: Vec<String>,
    pub repo_token: Option<String>,
    pub service: Option<String>,
    pub endpoint: Option<String>,
    pub job_id: Option<String>,
    pub parallel: bool,
    pub flag_name: Option<String>,
    pub ignore: Vec<String>,
    pub strict: bool,
    pub dry_run: bool,
    pub config: Option<PathBuf>,
}

impl PushConfig {
    /// A config that reads `coverprofiles` from `work_dir` with every other
    /// option at its default.
    pub fn new(work_dir: impl Into<PathBuf>, coverprofiles: Vec<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            coverprofiles,
            package: None,
            covermode: CoverMode::Count,
            race: false,
            test_verbose: false,
            test_args: Vec::new(),
            repo_token: None,
            service: None,
            endpoint: None,
            job_id: None,
            parallel: false,
            flag_name: None,
            ignore: Vec::new(),
            strict: false,
            dry_run: false,
            config: None,
        }
    }

    fn read_policy(&self, file_config: &CoverpushConfig) -> ReadPolicy {
        if self.strict {
            ReadPolicy::Fail
        } else {
            file_config.source.on_unreadable
        }
    }

    fn ignore_patterns(&self, file_config: &CoverpushConfig) -> Vec<String> {
        file_config
            .ignore
            .patterns
            .iter()
            .chain(self.ignore.iter())
            .cloned()
            .collect()
    }
}

pub fn handle_push(config: PushConfig) -> Result<()> {
    let file_config = match &config.config {
        Some(path) => config::load_config(Some(path.as_path()))?,
        None => config::discover_config(&config.work_dir),
    };

    let env = |key: &str| std::env::var(key).ok();
    let job = build_job(&config, &file_config, env)?;

    if config.dry_run || !is_uploadable(&job, env) {
        if !config.dry_run {
            log::warn!("No repo token and no CI service detected; printing the job instead");
        }
        println!("{}", job.to_json()?);
        return Ok(());
    }

    let endpoint = config
        .endpoint
        .as_deref()
        .unwrap_or(&file_config.upload.endpoint);
    let uploader = Uploader::new(
        endpoint,
        Duration::from_secs(file_config.upload.timeout_secs),
    )?;
    let response = uploader
        .submit(&job)
        .with_context(|| format!("Failed to upload job to {}", uploader.jobs_url()))?;

    println!("{}", response.message);
    if !response.url.is_empty() {
        println!("{}", response.url);
    }
    Ok(())
}

/// Everything up to the upload: profiles, report, git metadata and the
/// CI service, with environment lookups going through `env`.
pub fn build_job<F>(config: &PushConfig, file_config: &CoverpushConfig, env: F) -> Result<Job>
where
    F: Fn(&str) -> Option<String>,
{
    let runs = load_runs(config)?;
    let merged = merge_profiles(runs).context("Failed to merge coverage profiles")?;

    let base_dir =
        git::repository_root(&config.work_dir).unwrap_or_else(|| config.work_dir.clone());
    let resolver = FsResolver::discover(&config.work_dir);
    if let Some(module) = resolver.module() {
        log::debug!("Resolving sources against module {}", module.path);
    }
    let patterns = config.ignore_patterns(file_config);
    let filter = IgnoreFilter::new(patterns.as_slice())?;
    if !filter.is_empty() {
        log::debug!("Ignoring files matching {}", patterns.join(", "));
    }
    let source_files = ReportBuilder::new(&resolver, base_dir)
        .with_policy(config.read_policy(file_config))
        .with_filter(filter)
        .build(&merged)?;

    let git = git_info(&config.work_dir, env("GIT_BRANCH").as_deref());
    let settings = JobSettings {
        repo_token: config.repo_token.clone(),
        service_name: config.service.clone(),
        fallback_service_name: file_config.upload.service_name.clone(),
        job_id: config.job_id.clone(),
        parallel: config.parallel,
        flag_name: config.flag_name.clone(),
    };

    Ok(Job::assemble(settings, detect_service(&env), source_files, git))
}

/// One run per profile file, or a single `go test` run when none is given.
fn load_runs(config: &PushConfig) -> Result<Vec<Vec<Profile>>> {
    if config.coverprofiles.is_empty() {
        let run = TestRun {
            mode: config.covermode,
            verbose: config.test_verbose,
            race: config.race,
            args: config.test_args.clone(),
            package: config.package.clone(),
            ..TestRun::default()
        };
        let text = run.execute(&config.work_dir)?;
        return Ok(vec![parse_profiles(&text).context("Failed to parse go test profile")?]);
    }

    config
        .coverprofiles
        .iter()
        .map(|path| {
            let path = absolute_in(&config.work_dir, path);
            parse_profile_file(&path).map_err(|e| {
                let what = if e.is_parse_error() {
                    "Malformed"
                } else {
                    "Failed to read"
                };
                anyhow::Error::new(e).context(format!("{what} coverage profile {}", path.display()))
            })
        })
        .collect()
}

fn absolute_in(work_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        work_dir.join(path)
    }
}

fn git_info(work_dir: &Path, branch: Option<&str>) -> Option<GitInfo> {
    match git::collect_git_info(work_dir, branch) {
        Ok(info) => Some(info),
        Err(e) => {
            log::info!("No git information available: {e}");
            None
        }
    }
}

/// The API accepts jobs with a repo token, or from a CI service it can
/// verify on its own.
fn is_uploadable<F>(job: &Job, env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    job.repo_token.is_some() || detect_service(env).is_some()
}
