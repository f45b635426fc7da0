//! Source resolution and report assembly.
//!
//! Takes merged profiles, finds each file on disk, applies the ignore
//! filter and read policy, and projects the survivors into
//! [`SourceFile`](crate::profile::SourceFile) records.

pub mod builder;
pub mod filter;
pub mod resolver;

pub use builder::ReportBuilder;
pub use filter::IgnoreFilter;
pub use resolver::{gopath_from_env, parse_module_path, FsResolver, GoModule, SourceResolver};
