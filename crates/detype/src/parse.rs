//! Parsing a script unit with swc.

use crate::error::TransformError;
use crate::newline_runs;
use std::ops::Range;
use std::sync::Arc;
use swc_common::comments::{CommentKind, SingleThreadedComments};
use swc_common::{BytePos, FileName, SourceMap, Span, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// A comment with its byte range in the parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComment {
    /// Byte range including the delimiters.
    pub range: Range<usize>,
    /// Text between the delimiters.
    pub text: String,
    /// Whether this is a `//` comment.
    pub is_line: bool,
}

/// A parsed script unit.
pub struct ParsedSource {
    text: String,
    module: Module,
    comments: Vec<SourceComment>,
    base: BytePos,
    typescript: bool,
}

impl ParsedSource {
    /// The text that was parsed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The module AST.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// All comments in source order.
    pub fn comments(&self) -> &[SourceComment] {
        &self.comments
    }

    /// Whether the unit was parsed with the TypeScript grammar.
    pub fn is_typescript(&self) -> bool {
        self.typescript
    }

    /// Start offset of `span` in [`Self::text`].
    pub fn lo(&self, span: Span) -> usize {
        (span.lo.0.saturating_sub(self.base.0)) as usize
    }

    /// End offset of `span` in [`Self::text`].
    pub fn hi(&self, span: Span) -> usize {
        (span.hi.0.saturating_sub(self.base.0)) as usize
    }

    /// Byte range of `span` in [`Self::text`].
    pub fn range(&self, span: Span) -> Range<usize> {
        self.lo(span)..self.hi(span)
    }

    /// Source text covered by `span`.
    pub fn slice(&self, span: Span) -> &str {
        &self.text[self.range(span)]
    }
}

/// Whether a file name selects the TypeScript grammar.
pub fn is_typescript_file(file_name: &str) -> bool {
    !matches!(
        extension(file_name),
        Some("js" | "jsx" | "mjs" | "cjs" | "vue")
    )
}

fn extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    base.rsplit_once('.').map(|(_, ext)| ext)
}

/// Grammar for a file name: TypeScript unless the extension says JavaScript.
pub fn syntax_for(file_name: &str) -> Syntax {
    match extension(file_name) {
        Some("js" | "jsx" | "mjs" | "cjs") => Syntax::Es(EsSyntax {
            jsx: true,
            decorators: true,
            ..Default::default()
        }),
        Some("tsx") => Syntax::Typescript(TsSyntax {
            tsx: true,
            decorators: true,
            ..Default::default()
        }),
        _ => Syntax::Typescript(TsSyntax {
            tsx: false,
            decorators: true,
            dts: file_name.ends_with(".d.ts"),
            ..Default::default()
        }),
    }
}

/// Parses `text` as a module, collecting every comment.
pub fn parse_module(text: String, file_name: &str) -> Result<ParsedSource, TransformError> {
    let syntax = syntax_for(file_name);
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Custom(file_name.to_string()).into(), text.clone());
    let base = fm.start_pos;

    let comments = SingleThreadedComments::default();
    let mut parser = Parser::new(syntax, StringInput::from(&*fm), Some(&comments));

    let module = parser.parse_module().map_err(|err| {
        let offset = err.span().lo.0.saturating_sub(base.0) as usize;
        let (line, column) = newline_runs::original_position(&text, offset);
        TransformError::Parse {
            file_name: file_name.to_string(),
            line,
            column,
            message: err.kind().msg().into_owned(),
        }
    })?;

    for err in parser.take_errors() {
        let offset = err.span().lo.0.saturating_sub(base.0) as usize;
        let (line, column) = newline_runs::original_position(&text, offset);
        log::warn!(
            "{}:{}:{}: {}",
            file_name,
            line,
            column,
            err.kind().msg()
        );
    }

    let (leading, trailing) = comments.take_all();
    let mut all: Vec<SourceComment> = leading
        .take()
        .into_values()
        .chain(trailing.take().into_values())
        .flatten()
        .map(|c| SourceComment {
            range: (c.span.lo.0.saturating_sub(base.0) as usize)
                ..(c.span.hi.0.saturating_sub(base.0) as usize),
            text: c.text.to_string(),
            is_line: c.kind == CommentKind::Line,
        })
        .collect();
    all.sort_by_key(|c| c.range.start);
    all.dedup_by_key(|c| c.range.start);

    Ok(ParsedSource {
        text,
        module,
        comments: all,
        base,
        typescript: matches!(syntax, Syntax::Typescript(_)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_by_extension() {
        assert!(is_typescript_file("a.ts"));
        assert!(is_typescript_file("dir.v2/a.tsx"));
        assert!(is_typescript_file("App.vue.ts"));
        assert!(!is_typescript_file("a.mjs"));
        assert!(!is_typescript_file("a.jsx"));
    }

    #[test]
    fn test_offsets_and_comments() {
        let parsed = parse_module(
            "// head\nconst a: number = 1; /* tail */\n".to_string(),
            "a.ts",
        )
        .unwrap();
        assert_eq!(parsed.comments().len(), 2);
        assert_eq!(parsed.comments()[0].text, " head");
        assert!(parsed.comments()[0].is_line);
        assert_eq!(&parsed.text()[parsed.comments()[1].range.clone()], "/* tail */");

        let first = &parsed.module().body[0];
        assert_eq!(parsed.slice(first.span()), "const a: number = 1;");
    }

    #[test]
    fn test_parse_error_reports_original_line() {
        let err = parse_module("let a = 1;\n/* @detype: empty-line=3 */\nlet = ;\n".to_string(), "a.ts")
            .err()
            .unwrap();
        match err {
            TransformError::Parse { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }
}
