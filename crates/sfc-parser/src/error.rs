//! Parse error types.

use crate::Span;
use thiserror::Error;

/// An error that occurred while splitting a component document.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Whether the error leaves a block's boundaries unknown.
    ///
    /// Template-level errors still yield usable script regions; an unterminated
    /// top-level block does not.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, ParseErrorKind::UnclosedBlock { .. })
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// A top-level block has no closing tag.
    #[error("unclosed block: <{tag_name}>")]
    UnclosedBlock {
        /// The block's tag name.
        tag_name: String,
    },

    /// An element inside the template has no closing tag.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A mismatched closing tag was found.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// A block kind that may appear only once appeared twice.
    #[error("duplicate <{tag_name}> block")]
    DuplicateBlock {
        /// The duplicated block's tag name (`script setup` for setup scripts).
        tag_name: String,
    },

    /// An attribute value was opened with a quote but never closed.
    #[error("unterminated attribute value")]
    UnterminatedAttribute,

    /// A `{{` interpolation was never closed.
    #[error("unterminated interpolation")]
    UnterminatedInterpolation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ParseError::new(
            ParseErrorKind::MismatchedClosingTag {
                expected: "div".into(),
                found: "span".into(),
            },
            Span::from_offsets(0, 7),
        );
        assert_eq!(
            err.to_string(),
            "mismatched closing tag: expected </div>, found </span>"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_unclosed_block_is_fatal() {
        let err = ParseError::new(
            ParseErrorKind::UnclosedBlock {
                tag_name: "script".into(),
            },
            Span::from_offsets(0, 8),
        );
        assert!(err.is_fatal());
    }
}
