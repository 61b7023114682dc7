//! Newline-run codec.
//!
//! Runs of two or more newlines are replaced by a marker comment on its own
//! line that records the run length. Erasure leaves empty lines behind where
//! code was removed, and those are collapsed afterwards; the markers carry the
//! original blank lines through that collapse.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static NEWLINE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\* @detype: empty-line=([0-9]+) \*/").unwrap());

/// Text every marker comment contains.
pub const MARKER_TAG: &str = "@detype: empty-line";

/// Replaces each run of `n >= 2` newlines with `\n/* @detype: empty-line=n */\n`.
pub fn encode(text: &str) -> String {
    NEWLINE_RUN_RE
        .replace_all(text, |caps: &Captures| {
            format!("\n/* {}={} */\n", MARKER_TAG, caps[0].len())
        })
        .into_owned()
}

/// Replaces each marker with `n - 2` newlines.
///
/// The two newlines surrounding the marker are still in the text and make up
/// the rest of the run.
pub fn decode(text: &str) -> String {
    MARKER_RE
        .replace_all(text, |caps: &Captures| {
            let run: usize = caps[1].parse().unwrap_or(2);
            "\n".repeat(run.saturating_sub(2))
        })
        .into_owned()
}

/// Collapses every remaining run of newlines into one.
pub fn collapse(text: &str) -> String {
    NEWLINE_RUN_RE.replace_all(text, "\n").into_owned()
}

/// Maps a byte offset in encoded text to a 1-based `(line, column)` in the
/// text before encoding.
pub fn original_position(encoded: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(encoded.len());
    let prefix = &encoded[..floor_char_boundary(encoded, offset)];
    let mut line = 1 + prefix.matches('\n').count();
    for caps in MARKER_RE.captures_iter(prefix) {
        let run: usize = caps[1].parse().unwrap_or(2);
        // A marker line stands in for `run` newlines using two.
        line += run.saturating_sub(2);
    }
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = prefix[line_start..].chars().count() + 1;
    (line, column)
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_marks_runs() {
        assert_eq!(
            encode("a\n\nb\n\n\n\nc\nd"),
            "a\n/* @detype: empty-line=2 */\nb\n/* @detype: empty-line=4 */\nc\nd"
        );
    }

    #[test]
    fn test_roundtrip() {
        for text in [
            "",
            "a",
            "\n",
            "\n\n",
            "a\n\n\nb\n",
            "`line\n\n\nline`\n\nx",
            "\n\n\nleading",
        ] {
            assert_eq!(decode(&encode(text)), text, "text: {:?}", text);
        }
    }

    #[test]
    fn test_collapse_then_decode_restores_runs() {
        // A removed line between two markers leaves an empty line behind.
        let erased = "a;\n/* @detype: empty-line=3 */\n\nb;";
        assert_eq!(decode(&collapse(erased)), "a;\n\n\nb;");
    }

    #[test]
    fn test_original_position_skips_marker_lines() {
        let source = "a;\n\n\n\nb c";
        let encoded = encode(source);
        let offset = encoded.find('c').unwrap();
        assert_eq!(original_position(&encoded, offset), (5, 3));
    }
}
