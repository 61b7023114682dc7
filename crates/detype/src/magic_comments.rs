//! Magic-comment blocks.
//!
//! ```text
//! // @detype: replace
//! <typed implementation>
//! // @detype: with
//! // <untyped replacement>
//! // @detype: end
//! ```
//!
//! A block is processed only when all three sentinels are found in order.
//! Otherwise the text from the unmatched `replace` sentinel onward is left
//! as it is.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opens a block.
pub const REPLACE_SENTINEL: &str = "// @detype: replace\n";
/// Separates the typed span from the commented-out replacement.
pub const WITH_SENTINEL: &str = "// @detype: with\n";
/// Closes a block.
pub const END_SENTINEL: &str = "// @detype: end\n";

static LINE_COMMENT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*//").unwrap());

/// Sentinel offsets of one well-formed block.
struct Block {
    start: usize,
    with_start: usize,
    end_start: usize,
}

impl Block {
    fn replace_body(&self) -> usize {
        self.start + REPLACE_SENTINEL.len()
    }

    fn with_body(&self) -> usize {
        self.with_start + WITH_SENTINEL.len()
    }

    fn end(&self) -> usize {
        self.end_start + END_SENTINEL.len()
    }
}

fn find_from(text: &str, needle: &str, from: usize) -> Option<usize> {
    text.get(from..)
        .and_then(|rest| rest.find(needle))
        .map(|i| from + i)
}

/// Finds the next well-formed block at or after `from`.
///
/// `None` means either no `replace` sentinel remains or the next one is
/// unmatched; both end processing.
fn next_block(text: &str, from: usize) -> Option<Block> {
    let start = find_from(text, REPLACE_SENTINEL, from)?;
    let with_start = find_from(text, WITH_SENTINEL, start)?;
    let end_start = find_from(text, END_SENTINEL, with_start + WITH_SENTINEL.len())?;
    Some(Block {
        start,
        with_start,
        end_start,
    })
}

/// Applies every block in full-substitute mode.
///
/// The typed span is dropped and the replacement lines are uncommented. A
/// `replace` sentinel inside another block's typed span is dropped with it.
pub fn process_magic_comments(input: &str) -> String {
    rewrite_blocks(input, |text, block| {
        LINE_COMMENT_PREFIX_RE
            .replace_all(&text[block.with_body()..block.end_start], "")
            .into_owned()
    })
}

/// Applies every block in strip-only mode.
///
/// The typed span is kept verbatim; the replacement and all sentinels are
/// dropped.
pub fn strip_magic_comments(input: &str) -> String {
    rewrite_blocks(input, |text, block| {
        text[block.replace_body()..block.with_start].to_string()
    })
}

fn rewrite_blocks(input: &str, mut kept: impl FnMut(&str, &Block) -> String) -> String {
    let mut text = input.to_string();
    let mut from = 0;
    let mut count = 0usize;

    while let Some(block) = next_block(&text, from) {
        let replacement = kept(&text, &block);
        from = block.start + replacement.len();
        text.replace_range(block.start..block.end(), &replacement);
        count += 1;
    }

    if count > 0 {
        log::debug!("processed {} magic comment block(s)", count);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BLOCK: &str = "// @detype: replace\nconst x: number = 1;\n// @detype: with\n// const x = 1;\n// @detype: end\n";

    #[test]
    fn test_full_mode_substitutes() {
        assert_eq!(process_magic_comments(BLOCK), " const x = 1;\n");
    }

    #[test]
    fn test_strip_mode_keeps_typed_span() {
        assert_eq!(strip_magic_comments(BLOCK), "const x: number = 1;\n");
    }

    #[test]
    fn test_indented_replacement_keeps_inner_indentation() {
        let input = "  // @detype: replace\n  foo<T>();\n  // @detype: with\n  //   foo();\n  // @detype: end\n";
        // The sentinels are matched from their `//`, so leading indentation
        // before each sentinel stays in place.
        assert_eq!(process_magic_comments(input), "     foo();\n  ");
    }

    #[test]
    fn test_multiple_blocks() {
        let input = format!("a\n{}b\n{}c\n", BLOCK, BLOCK);
        assert_eq!(
            process_magic_comments(&input),
            "a\n const x = 1;\nb\n const x = 1;\nc\n"
        );
        assert_eq!(
            strip_magic_comments(&input),
            "a\nconst x: number = 1;\nb\nconst x: number = 1;\nc\n"
        );
    }

    #[test]
    fn test_missing_end_is_left_untouched() {
        let input = "// @detype: replace\nconst x: number = 1;\n// @detype: with\n// const x = 1;\n";
        assert_eq!(process_magic_comments(input), input);
        assert_eq!(strip_magic_comments(input), input);
    }

    #[test]
    fn test_malformed_block_after_good_block() {
        let bad = "// @detype: replace\nlet y: string;\n";
        let input = format!("{}{}", BLOCK, bad);
        assert_eq!(
            process_magic_comments(&input),
            format!(" const x = 1;\n{}", bad)
        );
    }

    #[test]
    fn test_nested_replace_is_inert() {
        let input = "// @detype: replace\nouter();\n// @detype: replace\ninner();\n// @detype: with\n// plain();\n// @detype: end\n";
        assert_eq!(process_magic_comments(input), " plain();\n");
        assert_eq!(
            strip_magic_comments(input),
            "outer();\n// @detype: replace\ninner();\n"
        );
    }
}
