//! Markup tokenizer.
//!
//! Only punctuation and names are tokens. Text, attribute values,
//! interpolations, comments and block contents are sliced straight out of the
//! source by the parser, which then skips the tokens it has covered.

use crate::Span;
use logos::Logos;

/// One markup token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Logos, Default)]
#[logos(skip r"[ \t\r\f]+")]
pub enum TokenKind {
    // Tag punctuation.
    #[token("<")]
    LAngle,
    #[token("</")]
    LAngleSlash,
    #[token(">")]
    RAngle,
    #[token("/>")]
    SlashRAngle,
    #[token("/")]
    Slash,
    #[token("<!--")]
    CommentOpen,

    // Attribute punctuation.
    #[token("=")]
    Eq,
    #[token("\"")]
    DoubleQuote,
    #[token("'")]
    SingleQuote,

    // Interpolation delimiters, and stray braces in text.
    #[token("{{")]
    LMustache,
    #[token("}}")]
    RMustache,
    #[regex(r"[{}]")]
    Brace,

    #[token("\n")]
    Newline,

    /// A tag name, attribute name, unquoted value or word of text.
    #[regex(r#"[^\s"'<>/={}]+"#)]
    Name,

    /// Past the last token.
    Eof,

    /// Anything logos could not match.
    #[default]
    Error,
}

/// Splits `source` into tokens. The end of input is not included; callers
/// treat reads past the last token as [`TokenKind::Eof`].
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(kind) = lexer.next() {
        let range = lexer.span();
        tokens.push(Token {
            kind: kind.unwrap_or(TokenKind::Error),
            span: Span::from_offsets(range.start, range.end),
        });
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_open_tag_with_directive() {
        assert_eq!(
            kinds(r#"<a @click.stop="go">"#),
            [LAngle, Name, Name, Eq, DoubleQuote, Name, DoubleQuote, RAngle]
        );
    }

    #[test]
    fn test_longest_punctuation_wins() {
        assert_eq!(
            kinds("<br/></p><!-- x -->"),
            [LAngle, Name, SlashRAngle, LAngleSlash, Name, RAngle, CommentOpen, Name, Name, RAngle]
        );
    }

    #[test]
    fn test_mustaches_and_braces() {
        assert_eq!(kinds("{{ a }} { b }"), [LMustache, Name, RMustache, Brace, Name, Brace]);
    }

    #[test]
    fn test_spans_and_newlines() {
        let tokens = tokenize("<p>\n  hi");
        assert_eq!(tokens[3].kind, Newline);
        assert_eq!(tokens[4].span, Span::from_offsets(6, 8));
    }
}
