// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod git;
pub mod job;
pub mod profile;
pub mod report;
pub mod runner;
pub mod upload;

// Re-export commonly used types
pub use crate::errors::{Error, Result};

pub use crate::profile::{
    format_profiles, merge_profiles, parse_profile_file, parse_profiles, project, BlockPosition,
    CoverMode, CoverageBlock, Profile, ProfileParser, SourceFile,
};

pub use crate::report::{FsResolver, IgnoreFilter, ReportBuilder, SourceResolver};

pub use crate::config::{load_config, CoverpushConfig, ReadPolicy};

pub use crate::job::{detect_service, Job, JobSettings};
