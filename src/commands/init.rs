use crate::config::{parse_and_validate_config, CONFIG_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# coverpush configuration

[source]
# "skip" leaves unreadable source files out of the report, "fail" aborts.
on_unreadable = "skip"

[ignore]
patterns = [
    "vendor/**",
    "*_mock.go",
    "*.pb.go"
]

[upload]
endpoint = "https://coveralls.io"
timeout_secs = 30
"#;

/// Write the default config into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {CONFIG_FILE_NAME} configuration file");

    Ok(())
}
