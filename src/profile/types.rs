//! Core data types for Go coverage profiles.
//!
//! Pure data definitions with no I/O. Everything else in the `profile`
//! module builds on these.
//!
//! # Types
//!
//! - [`CoverMode`] - The `mode:` tag from the profile header
//! - [`BlockPosition`] - Source range that identifies a block
//! - [`CoverageBlock`] - One block line of a profile
//! - [`Profile`] - All blocks recorded for a single file

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Counting mode recorded in the profile header.
///
/// `set` only records whether a block ran; `count` and `atomic` record how
/// many times. The mode decides how counts combine when runs are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    Set,
    Count,
    Atomic,
}

impl CoverMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CoverMode::Set => "set",
            CoverMode::Count => "count",
            CoverMode::Atomic => "atomic",
        }
    }

    /// Combine two hit counts for the same block from different runs.
    pub fn combine(&self, a: u64, b: u64) -> u64 {
        match self {
            CoverMode::Set => u64::from(a > 0 || b > 0),
            CoverMode::Count | CoverMode::Atomic => a.saturating_add(b),
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(CoverMode::Set),
            "count" => Ok(CoverMode::Count),
            "atomic" => Ok(CoverMode::Atomic),
            _ => Err(()),
        }
    }
}

/// Start and end of a block, 1-based lines and columns.
///
/// Derived ordering is line-major, so `start <= end` can be checked by
/// comparing `(start_line, start_col)` tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockPosition {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl BlockPosition {
    pub fn is_ordered(&self) -> bool {
        (self.start_line, self.start_col) <= (self.end_line, self.end_col)
    }
}

/// A single block line: `file:sl.sc,el.ec stmts count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageBlock {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub num_stmt: usize,
    pub count: u64,
}

impl CoverageBlock {
    pub fn position(&self) -> BlockPosition {
        BlockPosition {
            start_line: self.start_line,
            start_col: self.start_col,
            end_line: self.end_line,
            end_col: self.end_col,
        }
    }
}

/// Coverage blocks recorded for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// File name exactly as written in the profile (usually an import path)
    pub file_name: String,
    pub mode: CoverMode,
    /// Blocks in input order
    pub blocks: Vec<CoverageBlock>,
}

impl Profile {
    pub fn new(file_name: impl Into<String>, mode: CoverMode) -> Self {
        Self {
            file_name: file_name.into(),
            mode,
            blocks: Vec::new(),
        }
    }

    /// Sum of statements in blocks with a nonzero count.
    pub fn covered_statements(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.count > 0)
            .map(|b| b.num_stmt)
            .sum()
    }

    pub fn total_statements(&self) -> usize {
        self.blocks.iter().map(|b| b.num_stmt).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cover_mode_round_trips_through_str() {
        for mode in [CoverMode::Set, CoverMode::Count, CoverMode::Atomic] {
            assert_eq!(mode.as_str().parse::<CoverMode>(), Ok(mode));
        }
        assert!("Count".parse::<CoverMode>().is_err());
        assert!("".parse::<CoverMode>().is_err());
    }

    #[test]
    fn test_combine_counts() {
        assert_eq!(CoverMode::Count.combine(5, 7), 12);
        assert_eq!(CoverMode::Atomic.combine(0, 3), 3);
        assert_eq!(CoverMode::Set.combine(0, 3), 1);
        assert_eq!(CoverMode::Set.combine(0, 0), 0);
        assert_eq!(CoverMode::Count.combine(u64::MAX, 1), u64::MAX);
    }

    #[test]
    fn test_position_ordering() {
        let pos = BlockPosition {
            start_line: 3,
            start_col: 10,
            end_line: 3,
            end_col: 2,
        };
        assert!(!pos.is_ordered());

        let pos = BlockPosition {
            start_line: 3,
            start_col: 10,
            end_line: 4,
            end_col: 2,
        };
        assert!(pos.is_ordered());
    }

    #[test]
    fn test_statement_totals() {
        let mut profile = Profile::new("a.go", CoverMode::Count);
        profile.blocks.push(CoverageBlock {
            start_line: 1,
            start_col: 1,
            end_line: 2,
            end_col: 1,
            num_stmt: 2,
            count: 0,
        });
        profile.blocks.push(CoverageBlock {
            start_line: 3,
            start_col: 1,
            end_line: 4,
            end_col: 1,
            num_stmt: 3,
            count: 9,
        });
        assert_eq!(profile.total_statements(), 5);
        assert_eq!(profile.covered_statements(), 3);
    }
}
