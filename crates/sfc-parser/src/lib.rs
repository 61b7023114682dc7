//! Vue single-file component parser.
//!
//! This crate splits a `.vue` document into its top-level blocks and parses
//! the template into a light node tree. Script content is left untouched and
//! located by byte offsets so callers can splice rewritten code back in.
//!
//! # Example
//!
//! ```
//! use sfc_parser::parse;
//!
//! let source = "<script setup lang=\"ts\">\nconst n: number = 1;\n</script>";
//! let result = parse(source);
//! assert!(result.errors.is_empty());
//! let script = result.descriptor.script_setup.unwrap();
//! assert!(script.lang.is_typed());
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
mod span;

pub use ast::*;
pub use error::{ParseError, ParseErrorKind};
pub use parser::Parser;
pub use span::{ByteOffset, Span};

/// Options for the parser.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Skip script, style and custom blocks whose content is only whitespace.
    pub ignore_empty: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { ignore_empty: true }
    }
}

/// The result of parsing a component document.
#[derive(Debug)]
pub struct ParseResult {
    /// The split document.
    pub descriptor: SfcDescriptor,
    /// Any errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    /// The first error that leaves a block's boundaries unknown, if any.
    pub fn fatal_error(&self) -> Option<&ParseError> {
        self.errors.iter().find(|e| e.is_fatal())
    }
}

/// Parses a component document with default options.
pub fn parse(source: &str) -> ParseResult {
    parse_with_options(source, ParseOptions::default())
}

/// Parses a component document with custom options.
pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult {
    Parser::new(source, options).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.descriptor.template.is_none());
        assert!(result.descriptor.scripts().is_empty());
    }

    #[test]
    fn test_scripts_in_source_order() {
        let source = "<script setup lang=\"ts\">\nconst a = 1\n</script>\n<script lang=\"ts\">\nexport default {}\n</script>\n";
        let result = parse(source);
        let scripts = result.descriptor.scripts();
        assert_eq!(scripts.len(), 2);
        assert!(scripts[0].setup);
        assert!(!scripts[1].setup);
    }

    #[test]
    fn test_ignore_empty_blocks() {
        let source = "<script lang=\"ts\">\n\n</script>";
        assert!(parse(source).descriptor.script.is_none());

        let kept = parse_with_options(
            source,
            ParseOptions {
                ignore_empty: false,
            },
        );
        assert!(kept.descriptor.script.is_some());
    }

    #[test]
    fn test_duplicate_setup_script() {
        let source = "<script setup>\na\n</script><script setup>\nb\n</script>";
        let result = parse(source);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            result.errors[0].kind,
            ParseErrorKind::DuplicateBlock { .. }
        ));
        assert_eq!(
            result.descriptor.script_setup.map(|s| s.content),
            Some("\na\n".to_string())
        );
    }
}
