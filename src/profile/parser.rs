//! Profile text parser.
//!
//! The first line is `mode: foo`, where foo is `set`, `count`, or `atomic`.
//! The rest of the text is in the format
//!
//! ```text
//! encoding/base64/base64.go:34.44,37.40 3 1
//! ```
//!
//! where the fields are `name.go:line.column,line.column numberOfStatements count`.
//!
//! Any deviation aborts the parse. Blocks are kept in input order and files
//! are returned in order of first appearance.

use super::types::{CoverMode, CoverageBlock, Profile};
use crate::errors::{Error, Result};
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;

const MODE_PREFIX: &str = "mode: ";

const BLOCK_LINE_PATTERN: &str =
    r"^(.+):([0-9]+)\.([0-9]+),([0-9]+)\.([0-9]+) ([0-9]+) ([0-9]+)$";

/// Parser for the `go test -coverprofile` block format.
///
/// Holds the compiled block-line pattern so repeated parses in one run do
/// not recompile it.
#[derive(Debug, Clone)]
pub struct ProfileParser {
    block_line: Regex,
}

impl Default for ProfileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileParser {
    pub fn new() -> Self {
        Self {
            // The pattern is a literal; failure here is a programming error.
            block_line: Regex::new(BLOCK_LINE_PATTERN).unwrap_or_else(|e| {
                unreachable!("block line pattern failed to compile: {e}")
            }),
        }
    }

    /// Parse profile text into one [`Profile`] per file.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedHeader`] if line 1 is not a valid `mode:` line
    /// - [`Error::MalformedBlockLine`] for any non-empty line that is not a
    ///   well-formed block
    pub fn parse(&self, text: &str) -> Result<Vec<Profile>> {
        self.parse_with_mode(text).map(|(_, profiles)| profiles)
    }

    /// Like [`parse`](Self::parse), also returning the header mode, which
    /// is otherwise lost when the profile has no blocks.
    pub fn parse_with_mode(&self, text: &str) -> Result<(CoverMode, Vec<Profile>)> {
        let mut lines = text.lines();

        let mode = parse_mode_line(lines.next().unwrap_or(""))?;

        let mut profiles: Vec<Profile> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (offset, line) in lines.enumerate() {
            if line.is_empty() {
                continue;
            }
            // Header was line 1.
            let line_number = offset + 2;
            let (file_name, block) = self.parse_block_line(line, line_number)?;

            let slot = match index.get(file_name) {
                Some(&slot) => slot,
                None => {
                    profiles.push(Profile::new(file_name, mode));
                    index.insert(file_name.to_string(), profiles.len() - 1);
                    profiles.len() - 1
                }
            };
            profiles[slot].blocks.push(block);
        }

        if profiles.is_empty() {
            log::debug!("profile in {mode} mode contains no blocks");
        }

        Ok((mode, profiles))
    }

    fn parse_block_line<'a>(
        &self,
        line: &'a str,
        line_number: usize,
    ) -> Result<(&'a str, CoverageBlock)> {
        let malformed = || Error::malformed_block(line_number, line);

        let caps = self.block_line.captures(line).ok_or_else(malformed)?;
        let field = |i: usize| -> Result<u64> {
            caps.get(i)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(malformed)
        };
        let position = |i: usize| -> Result<usize> {
            usize::try_from(field(i)?).map_err(|_| malformed())
        };

        let block = CoverageBlock {
            start_line: position(2)?,
            start_col: position(3)?,
            end_line: position(4)?,
            end_col: position(5)?,
            num_stmt: position(6)?,
            count: field(7)?,
        };

        if block.start_line == 0 || !block.position().is_ordered() {
            return Err(malformed());
        }

        let file_name = caps.get(1).map(|m| m.as_str()).ok_or_else(malformed)?;
        Ok((file_name, block))
    }
}

fn parse_mode_line(line: &str) -> Result<CoverMode> {
    let bad = || Error::MalformedHeader {
        line: line.to_string(),
    };
    line.strip_prefix(MODE_PREFIX)
        .ok_or_else(bad)?
        .parse::<CoverMode>()
        .map_err(|_| bad())
}

/// Parse profile text with a fresh [`ProfileParser`].
pub fn parse_profiles(text: &str) -> Result<Vec<Profile>> {
    ProfileParser::new().parse(text)
}

/// Read and parse a profile file.
pub fn parse_profile_file(path: &Path) -> Result<Vec<Profile>> {
    let text = std::fs::read_to_string(path)?;
    log::debug!("Parsing coverage profile {}", path.display());
    parse_profiles(&text)
}
