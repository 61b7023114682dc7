//! Span-level text edits.
//!
//! Erasure never reprints code. Every change is an edit against the parsed
//! text, and text outside the edits is copied through byte for byte.

use std::ops::Range;

/// A single replacement of `start..end` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// Replacement text; empty for removals.
    pub text: String,
}

impl Edit {
    fn is_removal(&self) -> bool {
        self.text.is_empty()
    }
}

/// A collection of edits against one text.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    edits: Vec<Edit>,
}

impl EditSet {
    /// Creates an empty edit set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes `range`.
    pub fn remove(&mut self, range: Range<usize>) {
        if range.start < range.end {
            self.push(range, String::new());
        }
    }

    /// Replaces `range` with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.push(range, text.into());
    }

    /// Inserts `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.push(offset..offset, text.into());
    }

    /// Removes `range`, taking the surrounding indentation and trailing
    /// whitespace with it when the range is alone on its lines.
    ///
    /// The line break itself stays; the empty line left behind is collapsed
    /// after all edits are applied.
    pub fn remove_lines(&mut self, source: &str, range: Range<usize>) {
        let range = expand_to_lines(source, range);
        self.remove(range);
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether there are no edits.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    fn push(&mut self, range: Range<usize>, text: String) {
        self.edits.push(Edit {
            start: range.start,
            end: range.end,
            text,
        });
    }

    /// Applies the edits to `source`.
    ///
    /// Overlapping removals merge. An insertion or replacement that starts
    /// inside an already-removed range is dropped.
    pub fn apply(&self, source: &str) -> String {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by_key(|e| (e.start, e.end));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0;
        for edit in edits {
            if edit.start < cursor {
                if edit.is_removal() {
                    cursor = cursor.max(edit.end);
                } else {
                    log::debug!(
                        "dropping edit at {}..{} inside a removed range",
                        edit.start,
                        edit.end
                    );
                }
                continue;
            }
            out.push_str(&source[cursor..edit.start]);
            out.push_str(&edit.text);
            cursor = edit.end;
        }
        out.push_str(&source[cursor.min(source.len())..]);
        out
    }
}

/// Widens `range` to cover its indentation and trailing blanks when nothing
/// else shares its first and last line.
pub fn expand_to_lines(source: &str, range: Range<usize>) -> Range<usize> {
    let line_start = source[..range.start]
        .rfind('\n')
        .map(|i| i + 1)
        .unwrap_or(0);
    let line_end = source[range.end..]
        .find('\n')
        .map(|i| range.end + i)
        .unwrap_or(source.len());

    let is_blank = |s: &str| s.bytes().all(|b| b == b' ' || b == b'\t');
    if is_blank(&source[line_start..range.start]) && is_blank(&source[range.end..line_end]) {
        line_start..line_end
    } else {
        range
    }
}
