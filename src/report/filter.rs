//! Glob-based exclusion of files from the report.

use crate::errors::Result;
use glob::Pattern;

#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    patterns: Vec<Pattern>,
}

impl IgnoreFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .map(Pattern::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when `name` matches any pattern. `*` also matches `/`.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_ignores_nothing() {
        let filter = IgnoreFilter::new::<&str>(&[]).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.is_ignored("a.go"));
    }

    #[test]
    fn test_matches_patterns() {
        let filter = IgnoreFilter::new(&["vendor/*", "*_mock.go", " "]).unwrap();
        assert!(!filter.is_empty());
        assert!(filter.is_ignored("vendor/x/y.go"));
        assert!(filter.is_ignored("pkg/store_mock.go"));
        assert!(!filter.is_ignored("pkg/store.go"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(IgnoreFilter::new(&["[z-a"]).is_err());
    }
}
