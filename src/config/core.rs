use serde::{Deserialize, Serialize};

/// Default Coveralls API root
pub const DEFAULT_ENDPOINT: &str = "https://coveralls.io";

/// Root configuration structure, loaded from `.coverpush.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverpushConfig {
    /// Source resolution settings
    #[serde(default)]
    pub source: SourceConfig,

    /// Ignore patterns
    #[serde(default)]
    pub ignore: IgnoreConfig,

    /// Upload settings
    #[serde(default)]
    pub upload: UploadConfig,
}

/// What to do when a file named in a profile can't be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadPolicy {
    /// Log a warning and leave the file out of the report
    #[default]
    Skip,
    /// Abort the whole report
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub on_unreadable: ReadPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// API root; jobs are posted to `{endpoint}/api/v1/jobs`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service name reported when no CI service is detected
    #[serde(default)]
    pub service_name: Option<String>,

    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_name: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
