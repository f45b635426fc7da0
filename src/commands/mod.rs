//! CLI command implementations.
//!
//! Available commands:
//! - **push**: Build a Coveralls job from coverage profiles and upload it
//! - **merge**: Merge several coverage profiles into one
//! - **init**: Write a default `.coverpush.toml`

pub mod init;
pub mod merge;
pub mod push;

pub use init::init_config;
pub use merge::{handle_merge, merge_profile_files};
pub use push::{build_job, handle_push, PushConfig};
