//! Projection of block coverage onto source lines.
//!
//! A line touched by no block is `None` (no executable code), which is
//! distinct from `Some(0)` (code that never ran).

use super::types::Profile;
use serde::{Deserialize, Serialize};

/// A source file and its per-line coverage, as uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path reported to the service
    pub name: String,
    /// Full source text
    pub source: String,
    /// One entry per line; serialized as `null` or an integer
    pub coverage: Vec<Option<u64>>,
}

impl SourceFile {
    /// Number of lines with executable code.
    pub fn relevant_lines(&self) -> usize {
        self.coverage.iter().filter(|c| c.is_some()).count()
    }

    /// Number of lines hit at least once.
    pub fn covered_lines(&self) -> usize {
        self.coverage
            .iter()
            .filter(|c| matches!(c, Some(n) if *n > 0))
            .count()
    }
}

/// Number of lines in `source`: one more than the newline count, so a file
/// without a trailing newline still gets an entry for its last line.
pub fn line_count(source: &[u8]) -> usize {
    source.iter().filter(|&&b| b == b'\n').count() + 1
}

/// Build the per-line coverage array for `profile` over `source`.
///
/// Blocks are applied in order; a later block overwrites an earlier one on
/// shared lines. Lines past the end of `source` are ignored.
pub fn line_coverage(profile: &Profile, source: &[u8]) -> Vec<Option<u64>> {
    let mut coverage = vec![None; line_count(source)];

    for block in &profile.blocks {
        let first = block.start_line.saturating_sub(1);
        if block.end_line > coverage.len() {
            log::debug!(
                "{}: block {}.{},{}.{} extends past line {}",
                profile.file_name,
                block.start_line,
                block.start_col,
                block.end_line,
                block.end_col,
                coverage.len()
            );
        }
        let last = block.end_line.min(coverage.len());
        if first >= last {
            continue;
        }
        coverage[first..last].fill(Some(block.count));
    }

    coverage
}

/// Project `profile` onto the raw bytes of its source file.
///
/// The result is named after the profile's file name; callers that report
/// a different path rename it.
pub fn project(profile: &Profile, source: &[u8]) -> SourceFile {
    SourceFile {
        name: profile.file_name.clone(),
        source: String::from_utf8_lossy(source).into_owned(),
        coverage: line_coverage(profile, source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::{CoverMode, CoverageBlock};
    use crate::profile::{merge_profiles, parse_profiles};
    use pretty_assertions::assert_eq;

    fn block(start_line: usize, end_line: usize, count: u64) -> CoverageBlock {
        CoverageBlock {
            start_line,
            start_col: 1,
            end_line,
            end_col: 2,
            num_stmt: 1,
            count,
        }
    }

    fn profile(blocks: Vec<CoverageBlock>) -> Profile {
        Profile {
            file_name: "a.go".to_string(),
            mode: CoverMode::Count,
            blocks,
        }
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(b""), 1);
        assert_eq!(line_count(b"one"), 1);
        assert_eq!(line_count(b"one\ntwo\nthree"), 3);
        assert_eq!(line_count(b"one\ntwo\nthree\n"), 4);
    }

    #[test]
    fn test_three_line_block() {
        let profiles = parse_profiles("mode: count\na.go:1.1,3.2 2 5\n").unwrap();
        let sf = project(&profiles[0], b"package a\nfunc f() {\n}");
        assert_eq!(sf.name, "a.go");
        assert_eq!(sf.source, "package a\nfunc f() {\n}");
        assert_eq!(sf.coverage, vec![Some(5), Some(5), Some(5)]);
    }

    #[test]
    fn test_trailing_newline_adds_uninstrumented_entry() {
        let p = profile(vec![block(1, 3, 5)]);
        let coverage = line_coverage(&p, b"a\nb\nc\n");
        assert_eq!(coverage, vec![Some(5), Some(5), Some(5), None]);
    }

    #[test]
    fn test_untouched_lines_are_null() {
        let source = "1\n2\n3\n4\n5\n6\n7\n8\n9\n10";
        let p = profile(vec![block(3, 4, 2), block(5, 5, 0)]);
        let coverage = line_coverage(&p, source.as_bytes());
        assert_eq!(coverage.len(), 10);
        for i in [0, 1, 5, 6, 7, 8, 9] {
            assert_eq!(coverage[i], None, "line index {i}");
        }
        assert_eq!(&coverage[2..5], &[Some(2), Some(2), Some(0)]);
    }

    #[test]
    fn test_later_block_overwrites_shared_line() {
        let p = profile(vec![block(1, 3, 4), block(3, 4, 0)]);
        let coverage = line_coverage(&p, b"a\nb\nc\nd");
        assert_eq!(coverage, vec![Some(4), Some(4), Some(0), Some(0)]);

        let reversed = profile(vec![block(3, 4, 0), block(1, 3, 4)]);
        let coverage = line_coverage(&reversed, b"a\nb\nc\nd");
        assert_eq!(coverage, vec![Some(4), Some(4), Some(4), Some(0)]);
    }

    #[test]
    fn test_block_past_end_of_file_is_clamped() {
        let p = profile(vec![block(2, 9, 1), block(7, 8, 3)]);
        let coverage = line_coverage(&p, b"a\nb\nc");
        assert_eq!(coverage, vec![None, Some(1), Some(1)]);
    }

    #[test]
    fn test_merged_runs_project_summed_counts() {
        let first = parse_profiles("mode: count\na.go:1.1,3.2 2 5\n").unwrap();
        let second = parse_profiles("mode: count\na.go:1.1,3.2 2 7\n").unwrap();
        let merged = merge_profiles(vec![first, second]).unwrap();
        let sf = project(&merged[0], b"x\ny\nz");
        assert_eq!(sf.coverage, vec![Some(12), Some(12), Some(12)]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let p = profile(vec![block(1, 1, 1)]);
        let sf = project(&p, b"caf\xe9\n");
        assert_eq!(sf.source, "caf\u{fffd}\n");
        assert_eq!(sf.coverage, vec![Some(1), None]);
    }

    #[test]
    fn test_source_file_serializes_nulls() {
        let sf = SourceFile {
            name: "a.go".to_string(),
            source: "x\ny".to_string(),
            coverage: vec![None, Some(3)],
        };
        let json = serde_json::to_string(&sf).unwrap();
        assert_eq!(json, r#"{"name":"a.go","source":"x\ny","coverage":[null,3]}"#);
        assert_eq!(sf.relevant_lines(), 1);
        assert_eq!(sf.covered_lines(), 1);
    }
}
