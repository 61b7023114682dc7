//! Comment-retention policy.
//!
//! When a type-only construct is erased, the comments directly above it
//! usually document it and go with it. Scanning from the nearest comment
//! upward, a comment is deleted until one is found that is followed by a blank
//! line (or is itself a newline-run marker); that comment and everything
//! before it stay.

use crate::newline_runs::MARKER_TAG;
use crate::parse::SourceComment;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static BLANK_LINE_AFTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\n\s*\n").unwrap());
static TS_DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(@ts-ignore|@ts-expect-error)").unwrap());

/// The comments attached to the construct starting at `start`.
///
/// These are the comments before `start` separated from it, and from each
/// other, only by whitespace. A comment sharing its line with earlier code
/// trails that code and is not included.
pub fn leading_comments<'c>(
    source: &str,
    comments: &'c [SourceComment],
    start: usize,
) -> &'c [SourceComment] {
    let end = comments.partition_point(|c| c.range.end <= start);
    let mut first = end;
    let mut boundary = start;
    while first > 0 {
        let comment = &comments[first - 1];
        if !source[comment.range.end..boundary].trim().is_empty() {
            break;
        }
        first -= 1;
        boundary = comment.range.start;
    }

    if first < end {
        let head = comments[first].range.start;
        let line_start = source[..head].rfind('\n').map(|i| i + 1).unwrap_or(0);
        if !source[line_start..head].trim().is_empty() {
            let line_end = source[head..]
                .find('\n')
                .map(|i| head + i)
                .unwrap_or(source.len());
            while first < end && comments[first].range.start < line_end {
                first += 1;
            }
        }
    }

    &comments[first..end]
}

/// Ranges of the leading comments of a type-only construct that should be
/// deleted with it.
pub fn deletable_leading_comments(
    source: &str,
    comments: &[SourceComment],
    start: usize,
) -> Vec<Range<usize>> {
    let mut deleted = Vec::new();
    for comment in leading_comments(source, comments, start).iter().rev() {
        if BLANK_LINE_AFTER_RE.is_match(&source[comment.range.end..])
            || comment.text.contains(MARKER_TAG)
        {
            break;
        }
        deleted.push(comment.range.clone());
    }
    deleted
}

/// Whether a comment is a `@ts-ignore` or `@ts-expect-error` directive.
pub fn is_ts_directive(comment: &SourceComment) -> bool {
    TS_DIRECTIVE_RE.is_match(&comment.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use pretty_assertions::assert_eq;

    fn deletable(source: &str, needle: &str) -> Vec<String> {
        let parsed = parse_module(source.to_string(), "a.ts").unwrap();
        let start = source.find(needle).unwrap();
        deletable_leading_comments(parsed.text(), parsed.comments(), start)
            .into_iter()
            .map(|r| source[r].to_string())
            .collect()
    }

    #[test]
    fn test_adjacent_comment_is_deleted() {
        let source = "let a = 1;\n// doc\ninterface A {}\n";
        assert_eq!(deletable(source, "interface"), vec!["// doc"]);
    }

    #[test]
    fn test_comment_before_marker_is_kept() {
        let source = "// keep\n/* @detype: empty-line=2 */\n// doc\ntype A = 1;\n";
        assert_eq!(deletable(source, "type A"), vec!["// doc"]);
    }

    #[test]
    fn test_whitespace_only_line_counts_as_blank() {
        let source = "// keep\n  \n// doc\ntype A = 1;\n";
        assert_eq!(deletable(source, "type A"), vec!["// doc"]);
    }

    #[test]
    fn test_stops_at_first_blank_gap() {
        let source = "// one\n// two\n   \n// three\n// four\ntype A = 1;\n";
        assert_eq!(deletable(source, "type A"), vec!["// four", "// three"]);
    }

    #[test]
    fn test_trailing_comment_of_previous_line_is_not_leading() {
        let source = "let a = 1; // about a\ntype A = 1;\n";
        assert!(deletable(source, "type A").is_empty());
    }

    #[test]
    fn test_ts_directive_detection() {
        let comment = |text: &str| SourceComment {
            range: 0..0,
            text: text.to_string(),
            is_line: true,
        };
        assert!(is_ts_directive(&comment(" @ts-ignore")));
        assert!(is_ts_directive(&comment(" @ts-expect-error: reason")));
        assert!(!is_ts_directive(&comment(" see @ts-ignore")));
    }
}
