//! Merging profiles from repeated or parallel test runs.
//!
//! Blocks are matched by exact [`BlockPosition`] and their counts combined
//! with [`CoverMode::combine`]. A run's own blocks pass through untouched:
//! when a position repeats within one run, its n-th occurrence is paired
//! with the n-th occurrence accumulated from earlier runs. Merging a single
//! run therefore returns it unchanged, and the order of runs never changes
//! a merged count. Files and blocks keep the order in which they were first
//! seen.

use super::types::{BlockPosition, CoverMode, CoverageBlock, Profile};
use crate::errors::{Error, Result};
use std::collections::HashMap;

/// Accumulates blocks for one file across runs.
struct FileAccumulator {
    file_name: String,
    blocks: Vec<CoverageBlock>,
    /// Slots holding each position, in order of occurrence
    slots: HashMap<BlockPosition, Vec<usize>>,
    /// Run whose occurrences are counted in `occurrences`
    current_run: usize,
    occurrences: HashMap<BlockPosition, usize>,
}

impl FileAccumulator {
    fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            blocks: Vec::new(),
            slots: HashMap::new(),
            current_run: 0,
            occurrences: HashMap::new(),
        }
    }

    /// Fold one run's view of this file into the accumulator.
    fn absorb(&mut self, profile: &Profile, mode: CoverMode, run: usize) {
        if run != self.current_run {
            self.current_run = run;
            self.occurrences.clear();
        }

        for block in &profile.blocks {
            let position = block.position();
            let nth = self.occurrences.entry(position).or_insert(0);
            let slots = self.slots.entry(position).or_default();

            match slots.get(*nth) {
                Some(&i) => {
                    let merged = &mut self.blocks[i];
                    merged.count = mode.combine(merged.count, block.count);
                }
                None => {
                    slots.push(self.blocks.len());
                    self.blocks.push(*block);
                }
            }
            *nth += 1;
        }
    }

    fn finish(self, mode: CoverMode) -> Profile {
        Profile {
            file_name: self.file_name,
            mode,
            blocks: self.blocks,
        }
    }
}

/// Merge any number of parsed runs into one profile set.
///
/// Runs with no profiles (e.g. packages without test files) contribute
/// nothing. Zero runs produce an empty result.
///
/// # Errors
///
/// [`Error::ModeMismatch`] when runs were recorded in different modes.
pub fn merge_profiles<I>(runs: I) -> Result<Vec<Profile>>
where
    I: IntoIterator<Item = Vec<Profile>>,
{
    let mut mode: Option<CoverMode> = None;
    let mut files: Vec<FileAccumulator> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (run_number, run) in runs.into_iter().enumerate() {
        for profile in &run {
            let expected = *mode.get_or_insert(profile.mode);
            if profile.mode != expected {
                return Err(Error::ModeMismatch {
                    expected,
                    found: profile.mode,
                });
            }

            let slot = match index.get(&profile.file_name) {
                Some(&slot) => slot,
                None => {
                    files.push(FileAccumulator::new(&profile.file_name));
                    index.insert(profile.file_name.clone(), files.len() - 1);
                    files.len() - 1
                }
            };
            files[slot].absorb(profile, expected, run_number + 1);
        }
    }

    let Some(mode) = mode else {
        return Ok(Vec::new());
    };
    Ok(files.into_iter().map(|f| f.finish(mode)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{line_coverage, parse_profiles};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn block(start_line: usize, start_col: usize, count: u64) -> CoverageBlock {
        CoverageBlock {
            start_line,
            start_col,
            end_line: start_line + 1,
            end_col: 2,
            num_stmt: 1,
            count,
        }
    }

    fn profile(name: &str, mode: CoverMode, blocks: Vec<CoverageBlock>) -> Profile {
        Profile {
            file_name: name.to_string(),
            mode,
            blocks,
        }
    }

    #[test]
    fn test_merge_nothing() {
        assert!(merge_profiles(Vec::<Vec<Profile>>::new()).unwrap().is_empty());
        assert!(merge_profiles(vec![vec![], vec![]]).unwrap().is_empty());
    }

    #[test]
    fn test_merge_single_run_is_unchanged() {
        let run = parse_profiles("mode: count\nb.go:3.1,4.2 1 0\na.go:1.1,3.2 2 5\n").unwrap();
        assert_eq!(merge_profiles(vec![run.clone()]).unwrap(), run);
    }

    #[test]
    fn test_merge_sums_matching_blocks() {
        let first = parse_profiles("mode: count\na.go:1.1,3.2 2 5\n").unwrap();
        let second = parse_profiles("mode: count\na.go:1.1,3.2 2 7\n").unwrap();
        let merged = merge_profiles(vec![first, second]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].blocks[0].count, 12);
    }

    #[test]
    fn test_merge_skips_empty_runs_and_unions_files() {
        let runs = vec![
            vec![],
            vec![
                profile("name1", CoverMode::Count, vec![block(1, 1, 1)]),
                profile("name2", CoverMode::Count, vec![block(1, 1, 0)]),
            ],
            vec![],
            vec![
                profile("name1", CoverMode::Count, vec![block(1, 1, 1)]),
                profile("name2", CoverMode::Count, vec![block(1, 1, 1)]),
                profile("name3", CoverMode::Count, vec![block(9, 1, 4)]),
            ],
        ];

        let merged = merge_profiles(runs).unwrap();
        assert_eq!(
            merged,
            vec![
                profile("name1", CoverMode::Count, vec![block(1, 1, 2)]),
                profile("name2", CoverMode::Count, vec![block(1, 1, 1)]),
                profile("name3", CoverMode::Count, vec![block(9, 1, 4)]),
            ]
        );
    }

    #[test]
    fn test_blocks_differing_only_in_column_stay_separate() {
        let runs = vec![
            vec![profile("a.go", CoverMode::Count, vec![block(1, 1, 1)])],
            vec![profile("a.go", CoverMode::Count, vec![block(1, 5, 2)])],
        ];
        let merged = merge_profiles(runs).unwrap();
        assert_eq!(merged[0].blocks, vec![block(1, 1, 1), block(1, 5, 2)]);
    }

    #[test]
    fn test_set_mode_merge_saturates_at_one() {
        let runs = vec![
            vec![profile("a.go", CoverMode::Set, vec![block(1, 1, 0)])],
            vec![profile("a.go", CoverMode::Set, vec![block(1, 1, 1)])],
            vec![profile("a.go", CoverMode::Set, vec![block(1, 1, 1)])],
        ];
        let merged = merge_profiles(runs).unwrap();
        assert_eq!(merged[0].blocks[0].count, 1);
    }

    #[test]
    fn test_mode_mismatch() {
        let runs = vec![
            vec![profile("a.go", CoverMode::Count, vec![block(1, 1, 1)])],
            vec![profile("a.go", CoverMode::Set, vec![block(1, 1, 1)])],
        ];
        match merge_profiles(runs).unwrap_err() {
            Error::ModeMismatch { expected, found } => {
                assert_eq!(expected, CoverMode::Count);
                assert_eq!(found, CoverMode::Set);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_single_run_with_repeated_positions_is_unchanged() {
        let run = parse_profiles(indoc! {"
            mode: count
            a.go:1.1,3.2 1 3
            a.go:2.1,2.9 1 5
            a.go:1.1,3.2 1 8
        "})
        .unwrap();

        let merged = merge_profiles(vec![run.clone()]).unwrap();
        assert_eq!(merged, run);
        assert_eq!(
            line_coverage(&merged[0], b"a\nb\nc"),
            line_coverage(&run[0], b"a\nb\nc")
        );
    }

    #[test]
    fn test_repeated_positions_pair_by_occurrence() {
        let run = vec![profile(
            "a.go",
            CoverMode::Count,
            vec![block(1, 1, 3), block(1, 1, 8)],
        )];
        let merged = merge_profiles(vec![run.clone(), run]).unwrap();
        assert_eq!(merged[0].blocks, vec![block(1, 1, 6), block(1, 1, 16)]);
    }

    #[test]
    fn test_extra_occurrence_in_later_run_is_appended() {
        let first = vec![profile("a.go", CoverMode::Count, vec![block(1, 1, 2)])];
        let second = vec![profile(
            "a.go",
            CoverMode::Count,
            vec![block(1, 1, 5), block(1, 1, 7)],
        )];
        let merged = merge_profiles(vec![first, second]).unwrap();
        assert_eq!(merged[0].blocks, vec![block(1, 1, 7), block(1, 1, 7)]);
    }

    #[test]
    fn test_file_split_across_profiles_in_one_run() {
        let run = vec![
            profile("a.go", CoverMode::Count, vec![block(1, 1, 1)]),
            profile("a.go", CoverMode::Count, vec![block(1, 1, 4)]),
        ];
        let merged = merge_profiles(vec![run]).unwrap();
        assert_eq!(merged[0].blocks, vec![block(1, 1, 1), block(1, 1, 4)]);
    }
}
