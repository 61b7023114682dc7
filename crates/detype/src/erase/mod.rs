//! Type erasure by span removal.
//!
//! The module is walked once. Type-only syntax is turned into edits against
//! the parsed text; everything else is left exactly as written.

mod classes;
mod enums;
mod imports;
pub mod references;
mod visitor;

use crate::comments;
use crate::edits::EditSet;
use crate::error::TransformError;
use crate::parse::ParsedSource;
use references::{TopLevelBindings, ValueReferences};
use std::ops::Range;
use swc_common::Span;
use swc_ecma_visit::VisitWith;

/// Class member and parameter modifiers that only exist in TypeScript.
const TS_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "readonly",
    "override",
    "abstract",
    "declare",
];

/// Erases all type syntax of `parsed` into `edits`.
pub fn erase_types(
    parsed: &ParsedSource,
    file_name: &str,
    edits: &mut EditSet,
) -> Result<(), TransformError> {
    let references = ValueReferences::collect(parsed.module());
    let bindings = TopLevelBindings::collect(parsed.module());
    let mut eraser = Eraser {
        parsed,
        file_name,
        references: &references,
        bindings: &bindings,
        edits,
        error: None,
    };
    parsed.module().visit_with(&mut eraser);
    match eraser.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

pub(crate) struct Eraser<'a> {
    parsed: &'a ParsedSource,
    file_name: &'a str,
    references: &'a ValueReferences,
    bindings: &'a TopLevelBindings,
    edits: &'a mut EditSet,
    error: Option<TransformError>,
}

impl<'a> Eraser<'a> {
    fn text(&self) -> &'a str {
        self.parsed.text()
    }

    fn lo(&self, span: Span) -> usize {
        self.parsed.lo(span)
    }

    fn hi(&self, span: Span) -> usize {
        self.parsed.hi(span)
    }

    fn fail(&mut self, message: impl Into<String>) {
        if self.error.is_none() {
            self.error = Some(TransformError::unsupported(self.file_name, message));
        }
    }

    fn remove(&mut self, range: Range<usize>) {
        self.edits.remove(range);
    }

    fn remove_span(&mut self, span: Span) {
        let range = self.parsed.range(span);
        self.edits.remove(range);
    }

    /// Removes a whole construct that carries runtime meaning of its own
    /// (`declare` forms, unused imports). Comments above it stay.
    fn remove_construct(&mut self, span: Span) {
        let text = self.text();
        let start = self.construct_start(self.lo(span));
        let end = self.hi(span);
        self.edits.remove_lines(text, start..end);
    }

    /// Removes a type-only construct together with the leading comments the
    /// retention policy gives up.
    fn remove_type_only(&mut self, span: Span) {
        let start = self.construct_start(self.lo(span));
        let end = self.hi(span);
        self.remove_type_only_range(start..end);
    }

    fn remove_type_only_range(&mut self, range: Range<usize>) {
        let text = self.text();
        for comment in comments::deletable_leading_comments(text, self.parsed.comments(), range.start) {
            self.edits.remove_lines(text, comment);
        }
        self.edits.remove_lines(text, range);
    }

    /// Moves a construct start back over `declare` and `abstract` keywords
    /// that may sit outside its span.
    fn construct_start(&self, start: usize) -> usize {
        self.leading_keywords_start(start, &["declare", "abstract"])
    }

    /// Moves `pos` back over `keywords` written before it on the same line.
    ///
    /// The keywords are only taken when the first of them begins a statement
    /// or member, so `x = this.declare` and a keyword ending the previous
    /// line are left alone.
    fn leading_keywords_start(&self, pos: usize, keywords: &[&str]) -> usize {
        let text = self.text();
        let mut start = pos;
        loop {
            let end = self.skip_blanks_back(start);
            let word_start = text[..end]
                .char_indices()
                .rev()
                .find(|&(_, c)| !is_ident_char(c))
                .map_or(0, |(i, c)| i + c.len_utf8());
            if word_start == end || !keywords.contains(&&text[word_start..end]) {
                break;
            }
            start = word_start;
        }
        if start == pos {
            return pos;
        }
        let before = &text[..self.skip_blanks_back(start)];
        let starts_statement = before.is_empty()
            || before.ends_with("*/")
            || before.ends_with(['\n', '\r', ';', '{', '}']);
        if starts_statement {
            start
        } else {
            pos
        }
    }

    /// First non-whitespace offset at or after `pos`.
    fn skip_ws_forward(&self, pos: usize) -> usize {
        let text = self.text();
        pos + text[pos..]
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(text.len() - pos)
    }

    /// Offset just past the last non-whitespace character before `pos`.
    fn skip_ws_back(&self, pos: usize) -> usize {
        self.text()[..pos]
            .rfind(|c: char| !c.is_whitespace())
            .map(|i| i + self.text()[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(0)
    }

    /// Offset just past the last space or tab before `pos`, staying on the line.
    fn skip_blanks_back(&self, pos: usize) -> usize {
        let bytes = self.text().as_bytes();
        let mut p = pos;
        while p > 0 && (bytes[p - 1] == b' ' || bytes[p - 1] == b'\t') {
            p -= 1;
        }
        p
    }

    /// The identifier-like word ending right before `pos` (after whitespace).
    fn word_before(&self, pos: usize) -> Option<Range<usize>> {
        let end = self.skip_ws_back(pos);
        let text = &self.text()[..end];
        let start = text
            .char_indices()
            .rev()
            .find(|&(_, c)| !is_ident_char(c))
            .map_or(0, |(i, c)| i + c.len_utf8());
        (start < end).then_some(start..end)
    }

    /// Removes `keyword` and the whitespace after it if it is the word right
    /// before `pos`.
    fn remove_keyword_before(&mut self, pos: usize, keyword: &str) {
        if let Some(word) = self.word_before(pos) {
            if &self.text()[word.clone()] == keyword {
                self.remove(word.start..pos);
            }
        }
    }

    /// Removes a one-character marker (`?` or `!`) found right after `pos`.
    fn remove_marker_after(&mut self, pos: usize, marker: char) {
        let at = self.skip_ws_forward(pos);
        if self.text()[at..].starts_with(marker) {
            self.remove(at..at + 1);
        }
    }

    /// Removes a one-character marker found right before `pos`.
    fn remove_marker_before(&mut self, pos: usize, marker: char) {
        let end = self.skip_ws_back(pos);
        if end > 0 && self.text()[..end].ends_with(marker) {
            self.remove(end - 1..end);
        }
    }

    /// Removes TypeScript-only modifier words in `range`.
    fn remove_modifiers(&mut self, range: Range<usize>) {
        let text = self.text();
        let mut pos = range.start;
        while pos < range.end {
            let rest = &text[pos..range.end];
            let Some(offset) = rest.find(|c: char| c.is_alphanumeric() || c == '_' || c == '$')
            else {
                break;
            };
            let start = pos + offset;
            let len = text[start..range.end]
                .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
                .unwrap_or(range.end - start);
            let end = start + len;
            if TS_MODIFIERS.contains(&&text[start..end]) {
                let next = self.skip_ws_forward(end).min(range.end);
                self.remove(start..next);
            }
            pos = end;
        }
    }

    /// Indentation of the line containing `pos`.
    fn line_indent(&self, pos: usize) -> &'a str {
        let text = self.text();
        let line_start = text[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let rest = &text[line_start..];
        let len = rest
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(rest.len());
        &rest[..len]
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests;
