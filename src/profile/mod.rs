//! Go coverage profile parsing, merging and line projection.
//!
//! # Module Structure
//!
//! - [`types`] - Core data structures (pure data)
//! - [`parser`] - Profile text parsing
//! - [`merge`] - Combining profiles from several runs
//! - [`projector`] - Block coverage to per-line coverage
//! - [`writer`] - Profile text output for merged profiles
//!
//! # Pipeline
//!
//! ```text
//!   profile text ──► parse_profiles ──┐
//!   profile text ──► parse_profiles ──┼──► merge_profiles ──► project ──► SourceFile
//!   profile text ──► parse_profiles ──┘                        ▲
//!                                                   source bytes
//! ```
//!
//! Runs are merged at block level before projection. Projection itself never
//! sums: overlapping blocks within one profile overwrite each other in order.
//!
//! # Quick Start
//!
//! ```
//! use coverpush::profile::{parse_profiles, project};
//!
//! let profiles = parse_profiles("mode: count\na.go:1.1,3.2 2 5\n").unwrap();
//! let file = project(&profiles[0], b"package a\nfunc f() {\n}");
//! assert_eq!(file.coverage, vec![Some(5), Some(5), Some(5)]);
//! ```

pub mod merge;
pub mod parser;
pub mod projector;
pub mod types;
pub mod writer;

pub use merge::merge_profiles;
pub use parser::{parse_profile_file, parse_profiles, ProfileParser};
pub use projector::{line_count, line_coverage, project, SourceFile};
pub use types::{BlockPosition, CoverMode, CoverageBlock, Profile};
pub use writer::format_profiles;
