use crate::profile::CoverMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Coverage mode passed to `go test -covermode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Did each statement run
    Set,
    /// How many times did each statement run (default)
    Count,
    /// Like count, but exact in parallel tests
    Atomic,
}

impl From<ModeArg> for CoverMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Set => CoverMode::Set,
            ModeArg::Count => CoverMode::Count,
            ModeArg::Atomic => CoverMode::Atomic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "coverpush")]
#[command(about = "Report Go coverage profiles to Coveralls", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a job from coverage profiles and upload it
    Push {
        /// Coverage profiles to merge (comma-separated or repeated)
        #[arg(long = "coverprofile", value_delimiter = ',')]
        coverprofile: Vec<PathBuf>,

        /// Package to test when no profile is given
        #[arg(long)]
        package: Option<String>,

        /// Coverage mode for `go test`
        #[arg(long, value_enum, default_value = "count")]
        covermode: ModeArg,

        /// Pass -race to `go test`
        #[arg(long)]
        race: bool,

        /// Pass -v to `go test`
        #[arg(long = "test-verbose")]
        test_verbose: bool,

        /// Extra argument for `go test` (repeatable)
        #[arg(long = "test-arg", allow_hyphen_values = true)]
        test_args: Vec<String>,

        /// Repository token
        #[arg(long = "repotoken", env = "COVERALLS_TOKEN", hide_env_values = true)]
        repo_token: Option<String>,

        /// CI service name reported to the API
        #[arg(long)]
        service: Option<String>,

        /// API endpoint
        #[arg(long)]
        endpoint: Option<String>,

        /// Job id reported to the API
        #[arg(long = "jobid")]
        job_id: Option<String>,

        /// Mark this as one of several parallel jobs
        #[arg(long)]
        parallel: bool,

        /// Flag name for parallel jobs
        #[arg(long = "flagname")]
        flag_name: Option<String>,

        /// Glob patterns of files to leave out (comma-separated)
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Fail when a source file can't be read instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Print the job JSON instead of uploading it
        #[arg(long = "dry-run")]
        dry_run: bool,

        /// Config file (defaults to the nearest .coverpush.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Merge several coverage profiles into one
    Merge {
        /// Profiles to merge
        #[arg(required = true)]
        profiles: Vec<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default .coverpush.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
