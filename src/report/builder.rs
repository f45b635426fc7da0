//! Turning merged profiles into the source files of a job.

use super::filter::IgnoreFilter;
use super::resolver::SourceResolver;
use crate::config::ReadPolicy;
use crate::errors::{Error, Result};
use crate::profile::{project, Profile, SourceFile};
use std::path::{Component, Path, PathBuf};

/// Resolves, filters, reads and projects each profile.
pub struct ReportBuilder<'a, R: SourceResolver> {
    resolver: &'a R,
    base_dir: PathBuf,
    policy: ReadPolicy,
    filter: IgnoreFilter,
}

impl<'a, R: SourceResolver> ReportBuilder<'a, R> {
    /// `base_dir` is the directory reported names are made relative to,
    /// normally the repository root.
    pub fn new(resolver: &'a R, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            resolver,
            base_dir: base_dir.into(),
            policy: ReadPolicy::default(),
            filter: IgnoreFilter::default(),
        }
    }

    pub fn with_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_filter(mut self, filter: IgnoreFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Build one [`SourceFile`] per profile.
    ///
    /// # Errors
    ///
    /// [`Error::FileUnreadable`] for the first file that can't be located or
    /// read, under [`ReadPolicy::Fail`]. Under [`ReadPolicy::Skip`] such
    /// files are logged and left out.
    pub fn build(&self, profiles: &[Profile]) -> Result<Vec<SourceFile>> {
        let mut files = Vec::with_capacity(profiles.len());
        let (mut covered, mut total) = (0, 0);

        for profile in profiles {
            if self.filter.is_ignored(&profile.file_name) {
                log::debug!("Ignoring {}", profile.file_name);
                continue;
            }

            match self.build_one(profile) {
                Ok(Some(file)) => {
                    covered += profile.covered_statements();
                    total += profile.total_statements();
                    files.push(file);
                }
                Ok(None) => {}
                Err(e @ Error::FileUnreadable { .. }) if self.policy == ReadPolicy::Skip => {
                    log::warn!("{e} (skipping)");
                }
                Err(e) => return Err(e),
            }
        }

        log_summary(&files, covered, total);
        Ok(files)
    }

    fn build_one(&self, profile: &Profile) -> Result<Option<SourceFile>> {
        let name = &profile.file_name;
        let path = self
            .resolver
            .resolve(name)
            .map_err(|e| Error::unreadable(name.as_str(), None, e))?;

        let reported = self.reported_name(&path, name);
        if reported != *name && self.filter.is_ignored(&reported) {
            log::debug!("Ignoring {reported}");
            return Ok(None);
        }

        let bytes = self
            .resolver
            .read(&path)
            .map_err(|e| Error::unreadable(name.as_str(), Some(path.clone()), e))?;

        let mut file = project(profile, &bytes);
        file.name = reported;
        Ok(Some(file))
    }

    /// Path of `resolved` relative to the base directory with `/`
    /// separators, or `fallback` when the file lives outside it.
    fn reported_name(&self, resolved: &Path, fallback: &str) -> String {
        match pathdiff::diff_paths(resolved, &self.base_dir) {
            Some(relative)
                if relative.is_relative()
                    && !relative
                        .components()
                        .any(|c| matches!(c, Component::ParentDir)) =>
            {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            }
            _ => fallback.to_string(),
        }
    }
}

fn log_summary(files: &[SourceFile], covered_statements: usize, total_statements: usize) {
    let relevant: usize = files.iter().map(SourceFile::relevant_lines).sum();
    let covered: usize = files.iter().map(SourceFile::covered_lines).sum();
    if relevant == 0 {
        log::info!("{} source files, no instrumented lines", files.len());
    } else {
        log::info!(
            "{} source files, {}/{} lines covered ({:.1}%)",
            files.len(),
            covered,
            relevant,
            covered as f64 * 100.0 / relevant as f64
        );
    }
    log::debug!("{covered_statements}/{total_statements} statements covered");
}
