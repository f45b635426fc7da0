//! Writing profiles back out in the `go test -coverprofile` format.

use super::types::{CoverMode, Profile};
use std::fmt::Write;

/// Render `profiles` as profile text with a `mode:` header.
///
/// The output parses back to the same profiles.
pub fn format_profiles(mode: CoverMode, profiles: &[Profile]) -> String {
    let mut out = format!("mode: {mode}\n");
    for profile in profiles {
        for b in &profile.blocks {
            // Writing to a String cannot fail.
            let _ = writeln!(
                out,
                "{}:{}.{},{}.{} {} {}",
                profile.file_name,
                b.start_line,
                b.start_col,
                b.end_line,
                b.end_col,
                b.num_stmt,
                b.count
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{merge_profiles, parse_profiles};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_merged_profile() {
        let a = parse_profiles("mode: count\nx.go:1.1,2.2 1 1\ny.go:4.3,6.1 2 0\n").unwrap();
        let b = parse_profiles("mode: count\ny.go:4.3,6.1 2 5\n").unwrap();
        let merged = merge_profiles(vec![a, b]).unwrap();

        assert_eq!(
            format_profiles(CoverMode::Count, &merged),
            indoc! {"
                mode: count
                x.go:1.1,2.2 1 1
                y.go:4.3,6.1 2 5
            "}
        );
    }

    #[test]
    fn test_empty_profile_keeps_header() {
        assert_eq!(format_profiles(CoverMode::Set, &[]), "mode: set\n");
    }
}
