use crate::profile::{format_profiles, merge_profiles, ProfileParser};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Merge profile files and render the result as profile text.
pub fn merge_profile_files(paths: &[PathBuf]) -> Result<String> {
    let parser = ProfileParser::new();
    let mut header_mode = None;
    let mut runs = Vec::with_capacity(paths.len());

    for path in paths {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile {}", path.display()))?;
        let (mode, profiles) = parser
            .parse_with_mode(&text)
            .with_context(|| format!("Failed to parse profile {}", path.display()))?;
        header_mode.get_or_insert(mode);
        runs.push(profiles);
    }

    let merged = merge_profiles(runs)?;
    let mode = merged
        .first()
        .map(|p| p.mode)
        .or(header_mode)
        .context("No profiles to merge")?;

    log::info!("Merged {} profiles covering {} files", paths.len(), merged.len());
    Ok(format_profiles(mode, &merged))
}

/// `coverpush merge`: write merged profile text to `output` or stdout.
pub fn handle_merge(paths: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let text = merge_profile_files(paths)?;
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_merge_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.out");
        let b = temp.path().join("b.out");
        let empty = temp.path().join("empty.out");
        fs::write(&a, "mode: count\nx.go:1.1,2.2 1 5\n").unwrap();
        fs::write(&b, "mode: count\nx.go:1.1,2.2 1 7\n").unwrap();
        fs::write(&empty, "mode: count\n").unwrap();

        let text = merge_profile_files(&[a, empty, b]).unwrap();
        assert_eq!(text, "mode: count\nx.go:1.1,2.2 1 12\n");
    }

    #[test]
    fn test_merge_only_empty_profiles_keeps_mode() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty.out");
        fs::write(&empty, "mode: atomic\n").unwrap();

        assert_eq!(merge_profile_files(&[empty]).unwrap(), "mode: atomic\n");
    }

    #[test]
    fn test_merge_reports_bad_file() {
        let temp = TempDir::new().unwrap();
        let bad = temp.path().join("bad.out");
        fs::write(&bad, "not a profile\n").unwrap();

        let err = merge_profile_files(&[bad]).unwrap_err();
        assert!(err.to_string().contains("Failed to parse profile"));
    }

    #[test]
    fn test_handle_merge_writes_output() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.out");
        fs::write(&a, "mode: set\nx.go:1.1,2.2 1 1\n").unwrap();
        let out = temp.path().join("merged.out");

        handle_merge(&[a], Some(&out)).unwrap();
        assert_eq!(
            fs::read_to_string(out).unwrap(),
            "mode: set\nx.go:1.1,2.2 1 1\n"
        );
    }
}
