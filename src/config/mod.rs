//! `.coverpush.toml` configuration.
//!
//! ```toml
//! [source]
//! on_unreadable = "fail"   # or "skip" (default)
//!
//! [ignore]
//! patterns = ["vendor/**", "*_mock.go"]
//!
//! [upload]
//! endpoint = "https://coveralls.io"
//! service_name = "jenkins"
//! timeout_secs = 30
//! ```
//!
//! Command-line flags override values loaded here.

mod core;
mod loader;

pub use self::core::{
    CoverpushConfig, IgnoreConfig, ReadPolicy, SourceConfig, UploadConfig, DEFAULT_ENDPOINT,
};
pub use self::loader::{
    directory_ancestors, discover_config, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
