//! Running `go test` to produce a coverage profile.

use crate::errors::{Error, Result};
use crate::profile::CoverMode;
use std::path::Path;
use std::process::{Command, Stdio};

const PROFILE_FILE: &str = "cover.out";

/// How to invoke `go test`
#[derive(Debug, Clone)]
pub struct TestRun {
    pub go: String,
    pub mode: CoverMode,
    pub verbose: bool,
    pub race: bool,
    /// Extra arguments passed before the package
    pub args: Vec<String>,
    pub package: Option<String>,
}

impl Default for TestRun {
    fn default() -> Self {
        Self {
            go: "go".to_string(),
            mode: CoverMode::Count,
            verbose: false,
            race: false,
            args: Vec::new(),
            package: None,
        }
    }
}

impl TestRun {
    /// Arguments for `go`, writing the profile to `profile`.
    pub fn arguments(&self, profile: &Path) -> Vec<String> {
        let mut args = vec![
            "test".to_string(),
            format!("-covermode={}", self.mode),
            format!("-coverprofile={}", profile.display()),
        ];
        if self.verbose {
            args.push("-v".to_string());
        }
        if self.race {
            args.push("-race".to_string());
        }
        args.extend(self.args.iter().cloned());
        if let Some(pkg) = &self.package {
            args.push(pkg.clone());
        }
        args
    }

    /// Run the tests in `work_dir` and return the profile text.
    ///
    /// Test output goes to stderr so stdout stays free for the job JSON.
    pub fn execute(&self, work_dir: &Path) -> Result<String> {
        let scratch = tempfile::tempdir()?;
        let profile = scratch.path().join(PROFILE_FILE);
        let args = self.arguments(&profile);
        log::info!("Running {} {}", self.go, args.join(" "));

        let status = Command::new(&self.go)
            .args(&args)
            .current_dir(work_dir)
            .stdout(Stdio::from(std::io::stderr()))
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| Error::TestRun(format!("failed to start {}: {}", self.go, e)))?;

        if !status.success() {
            return Err(Error::TestRun(format!("{} test exited with {}", self.go, status)));
        }

        std::fs::read_to_string(&profile).map_err(|e| {
            Error::TestRun(format!("no profile written to {}: {}", profile.display(), e))
        })
    }
}
