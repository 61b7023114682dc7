//! Recursive descent parser for Vue single-file components.

use crate::ast::*;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{tokenize, Token, TokenKind};
use crate::{ParseOptions, ParseResult, Span};
use smol_str::SmolStr;
use text_size::TextSize;

/// HTML void elements that never have closing tags.
const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Native HTML, SVG and MathML tag names. Anything else in a template is
/// resolved as a component.
const NATIVE_TAGS: &[&str] = &[
    // HTML
    "html", "body", "base", "head", "link", "meta", "style", "title", "address", "article",
    "aside", "footer", "header", "hgroup", "h1", "h2", "h3", "h4", "h5", "h6", "nav", "section",
    "div", "dd", "dl", "dt", "figcaption", "figure", "picture", "hr", "img", "li", "main", "ol",
    "p", "pre", "ul", "a", "b", "abbr", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em",
    "i", "kbd", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strong", "sub",
    "sup", "time", "u", "var", "wbr", "area", "audio", "map", "track", "video", "embed", "object",
    "param", "source", "canvas", "script", "noscript", "del", "ins", "caption", "col", "colgroup",
    "table", "thead", "tbody", "td", "th", "tr", "button", "datalist", "fieldset", "form",
    "input", "label", "legend", "meter", "optgroup", "option", "output", "progress", "select",
    "textarea", "details", "dialog", "menu", "summary", "blockquote", "iframe", "tfoot",
    "search", // SVG
    "svg", "animate", "animateMotion", "animateTransform", "circle", "clipPath", "defs", "desc",
    "discard", "ellipse", "feBlend", "feColorMatrix", "feComponentTransfer", "feComposite",
    "feConvolveMatrix", "feDiffuseLighting", "feDisplacementMap", "feDistantLight",
    "feDropShadow", "feFlood", "feFuncA", "feFuncB", "feFuncG", "feFuncR", "feGaussianBlur",
    "feImage", "feMerge", "feMergeNode", "feMorphology", "feOffset", "fePointLight",
    "feSpecularLighting", "feSpotLight", "feTile", "feTurbulence", "filter", "foreignObject",
    "g", "image", "line", "linearGradient", "marker", "mask", "metadata", "mpath", "path",
    "pattern", "polygon", "polyline", "radialGradient", "rect", "set", "stop", "switch",
    "symbol", "text", "textPath", "tspan", "use", "view", // MathML
    "math", "mi", "mn", "mo", "ms", "mspace", "mtext", "mrow", "mfrac", "msqrt", "mroot",
    "msub", "msup", "msubsup", "munder", "mover", "munderover", "mtable", "mtr", "mtd",
];

/// Returns true if the given element name is an HTML void element.
fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_lowercase().as_str())
}

/// Classifies a template tag.
fn element_kind(tag: &str) -> ElementKind {
    match tag {
        "template" => ElementKind::Template,
        "slot" => ElementKind::Slot,
        _ if NATIVE_TAGS.contains(&tag) => ElementKind::Element,
        _ => ElementKind::Component,
    }
}

/// An opening tag with its raw attributes.
struct OpenTag {
    name: SmolStr,
    attributes: Vec<StaticAttribute>,
    span: Span,
    self_closing: bool,
}

/// The component document parser.
pub struct Parser<'src> {
    /// The source being parsed.
    source: &'src str,
    /// The token stream.
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Parse errors collected during parsing.
    errors: Vec<ParseError>,
    /// Parser options.
    options: ParseOptions,
    /// Names of the template elements currently open, innermost last.
    open_elements: Vec<SmolStr>,
    /// EOF token for when we're past the end
    eof_token: Token,
}

impl<'src> Parser<'src> {
    /// Creates a new parser.
    pub fn new(source: &'src str, options: ParseOptions) -> Self {
        let tokens = tokenize(source);
        let eof_token = Token {
            kind: TokenKind::Eof,
            span: Span::empty(TextSize::from(source.len() as u32)),
        };
        Self {
            source,
            tokens,
            pos: 0,
            errors: Vec::new(),
            options,
            open_elements: Vec::new(),
            eof_token,
        }
    }

    /// Parses the source into a descriptor.
    pub fn parse(mut self) -> ParseResult {
        let descriptor = self.parse_descriptor();
        ParseResult {
            descriptor,
            errors: self.errors,
        }
    }

    // === Token helpers ===

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof_token)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn current_text(&self) -> &'src str {
        let span = self.current().span;
        &self.source[span.range()]
    }

    fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn error(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError::new(kind, span));
    }

    /// Advances past every token that starts before `offset`.
    fn skip_to(&mut self, offset: usize) {
        while self.current().span.lo() < offset && !self.check(TokenKind::Eof) {
            self.advance();
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(TokenKind::Newline) {}
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.source
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|rel| from + rel)
    }

    // === Document level ===

    fn parse_descriptor(&mut self) -> SfcDescriptor {
        let mut descriptor = SfcDescriptor::default();

        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::CommentOpen => {
                    self.read_comment();
                }
                TokenKind::LAngle if self.peek_kind(1) == TokenKind::Name => {
                    self.parse_block(&mut descriptor);
                }
                _ => self.advance(),
            }
        }

        descriptor.span = Span::from_offsets(0, self.source.len());
        descriptor
    }

    fn parse_block(&mut self, descriptor: &mut SfcDescriptor) {
        let open = self.parse_open_tag();
        let content_start = open.span.hi();

        if open.name == "template" {
            let template = self.parse_template_block(open);
            if descriptor.template.is_some() {
                self.error(
                    ParseErrorKind::DuplicateBlock {
                        tag_name: "template".into(),
                    },
                    template.span,
                );
            } else {
                descriptor.template = Some(template);
            }
            return;
        }

        let (content_end, block_end) = if open.self_closing {
            (content_start, content_start)
        } else {
            self.read_raw_block(&open.name, content_start)
        };
        let content_span = Span::from_offsets(content_start, content_end);
        let content = self.source[content_span.range()].to_string();
        let span = Span::new(open.span.start, TextSize::from(block_end as u32));
        let has_src = open.attributes.iter().any(|a| a.name == "src");

        if self.options.ignore_empty
            && open.name != "template"
            && content.trim().is_empty()
            && !has_src
        {
            return;
        }

        match open.name.as_str() {
            "script" => {
                let lang = open
                    .attributes
                    .iter()
                    .find(|a| a.name == "lang")
                    .and_then(|a| a.value.as_ref())
                    .map(|v| ScriptLang::from_attribute(&v.value))
                    .unwrap_or_default();
                let setup = open.attributes.iter().any(|a| a.name == "setup");
                let block = ScriptBlock {
                    span,
                    open_tag_span: open.span,
                    content_span,
                    content,
                    lang,
                    setup,
                    attributes: open.attributes,
                };
                let slot = if setup {
                    &mut descriptor.script_setup
                } else {
                    &mut descriptor.script
                };
                if slot.is_some() {
                    let tag_name = if setup { "script setup" } else { "script" };
                    self.error(
                        ParseErrorKind::DuplicateBlock {
                            tag_name: tag_name.into(),
                        },
                        span,
                    );
                } else {
                    *slot = Some(block);
                }
            }
            tag => {
                let block = Block {
                    tag: SmolStr::new(tag),
                    span,
                    content_span,
                    content,
                    attributes: open.attributes,
                };
                if tag == "style" {
                    descriptor.styles.push(block);
                } else {
                    descriptor.custom_blocks.push(block);
                }
            }
        }
    }

    /// Reads raw block content up to `</tag`. Returns the content end and the
    /// offset just past the closing tag.
    fn read_raw_block(&mut self, tag: &str, content_start: usize) -> (usize, usize) {
        let close = format!("</{}", tag);
        match self.find_from(content_start, &close) {
            Some(content_end) => {
                let block_end = self
                    .find_from(content_end + close.len(), ">")
                    .map(|gt| gt + 1)
                    .unwrap_or(self.source.len());
                self.skip_to(block_end);
                (content_end, block_end)
            }
            None => {
                self.error(
                    ParseErrorKind::UnclosedBlock {
                        tag_name: tag.to_string(),
                    },
                    Span::from_offsets(content_start, self.source.len()),
                );
                self.skip_to(self.source.len());
                (self.source.len(), self.source.len())
            }
        }
    }

    fn parse_template_block(&mut self, open: OpenTag) -> TemplateBlock {
        let content_start = open.span.hi();
        let lang = open
            .attributes
            .iter()
            .find(|a| a.name == "lang")
            .and_then(|a| a.value.as_ref())
            .map(|v| SmolStr::new(v.value.trim()));

        let is_html = lang.as_deref().map_or(true, |l| l == "html");

        let (content_end, block_end, ast) = if open.self_closing {
            (content_start, content_start, None)
        } else if !is_html {
            match self.find_template_close(content_start) {
                Some(content_end) => {
                    let block_end = self
                        .find_from(content_end, ">")
                        .map(|gt| gt + 1)
                        .unwrap_or(self.source.len());
                    self.skip_to(block_end);
                    (content_end, block_end, None)
                }
                None => {
                    self.error(
                        ParseErrorKind::UnclosedBlock {
                            tag_name: "template".into(),
                        },
                        open.span,
                    );
                    self.skip_to(self.source.len());
                    (self.source.len(), self.source.len(), None)
                }
            }
        } else {
            self.open_elements.push(SmolStr::new("template"));
            let nodes = self.parse_children();
            self.open_elements.pop();

            if self.check(TokenKind::LAngleSlash) {
                let content_end = self.current().span.lo();
                let block_end = self.skip_closing_tag();
                let fragment = Fragment {
                    nodes,
                    span: Span::from_offsets(content_start, content_end),
                };
                (content_end, block_end, Some(fragment))
            } else {
                self.error(
                    ParseErrorKind::UnclosedBlock {
                        tag_name: "template".into(),
                    },
                    open.span,
                );
                let end = self.source.len();
                let fragment = Fragment {
                    nodes,
                    span: Span::from_offsets(content_start, end),
                };
                (end, end, Some(fragment))
            }
        };

        let content_span = Span::from_offsets(content_start, content_end);
        TemplateBlock {
            span: Span::new(open.span.start, TextSize::from(block_end as u32)),
            content_span,
            content: self.source[content_span.range()].to_string(),
            lang,
            attributes: open.attributes,
            ast,
        }
    }

    /// Finds the `</template` matching an already-open `<template>`, counting
    /// nested template tags.
    fn find_template_close(&self, from: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut cursor = from;
        loop {
            let close = self.find_from(cursor, "</template")?;
            let open = self.find_from(cursor, "<template").filter(|&o| {
                o < close
                    && self.source[o + "<template".len()..]
                        .chars()
                        .next()
                        .map_or(false, |c| c.is_whitespace() || c == '>' || c == '/')
            });
            match open {
                Some(o) => {
                    depth += 1;
                    cursor = o + "<template".len();
                }
                None if depth == 0 => return Some(close),
                None => {
                    depth -= 1;
                    cursor = close + "</template".len();
                }
            }
        }
    }

    // === Tags and attributes ===

    fn parse_open_tag(&mut self) -> OpenTag {
        let start = self.current().span.start;
        self.eat(TokenKind::LAngle);
        let name = SmolStr::new(self.current_text());
        self.advance();

        let mut attributes = Vec::new();
        let mut self_closing = false;
        let end = loop {
            self.skip_newlines();
            match self.current_kind() {
                TokenKind::RAngle => {
                    let end = self.current().span.end;
                    self.advance();
                    break end;
                }
                TokenKind::SlashRAngle => {
                    let end = self.current().span.end;
                    self_closing = true;
                    self.advance();
                    break end;
                }
                TokenKind::Name => attributes.push(self.parse_attribute()),
                TokenKind::Eof => {
                    self.error(
                        ParseErrorKind::UnclosedTag {
                            tag_name: name.to_string(),
                        },
                        Span::new(start, self.current().span.start),
                    );
                    break self.current().span.start;
                }
                _ => self.advance(),
            }
        };

        OpenTag {
            name,
            attributes,
            span: Span::new(start, end),
            self_closing,
        }
    }

    fn parse_attribute(&mut self) -> StaticAttribute {
        let name = SmolStr::new(self.current_text());
        let start = self.current().span.start;
        let mut end = self.current().span.end;
        self.advance();

        let before_eq = self.pos;
        self.skip_newlines();
        if !self.eat(TokenKind::Eq) {
            self.pos = before_eq;
            return StaticAttribute {
                span: Span::new(start, end),
                name,
                value: None,
            };
        }
        self.skip_newlines();

        let value = match self.current_kind() {
            TokenKind::DoubleQuote | TokenKind::SingleQuote => {
                let quote = if self.check(TokenKind::DoubleQuote) {
                    "\""
                } else {
                    "'"
                };
                let value_start = self.current().span.hi();
                let value_end = match self.find_from(value_start, quote) {
                    Some(close) => {
                        end = TextSize::from((close + 1) as u32);
                        close
                    }
                    None => {
                        self.error(
                            ParseErrorKind::UnterminatedAttribute,
                            Span::new(start, self.eof_token.span.start),
                        );
                        end = self.eof_token.span.start;
                        self.source.len()
                    }
                };
                self.skip_to(u32::from(end) as usize);
                let span = Span::from_offsets(value_start, value_end);
                Some(TextValue {
                    span,
                    value: self.source[span.range()].to_string(),
                })
            }
            TokenKind::Name => {
                let span = self.current().span;
                end = span.end;
                self.advance();
                Some(TextValue {
                    span,
                    value: self.source[span.range()].to_string(),
                })
            }
            _ => None,
        };

        StaticAttribute {
            span: Span::new(start, end),
            name,
            value,
        }
    }

    /// At `</`, returns the closing tag's name without consuming it.
    fn peek_closing_name(&self) -> &'src str {
        match self.tokens.get(self.pos + 1) {
            Some(token) if token.kind == TokenKind::Name => &self.source[token.span.range()],
            _ => "",
        }
    }

    /// Consumes a closing tag and returns the offset just past it.
    fn skip_closing_tag(&mut self) -> usize {
        self.eat(TokenKind::LAngleSlash);
        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::RAngle) {
                let end = self.current().span.hi();
                self.advance();
                return end;
            }
            self.advance();
        }
        self.source.len()
    }

    // === Template nodes ===

    fn parse_children(&mut self) -> Vec<TemplateNode> {
        let mut nodes = Vec::new();

        loop {
            match self.current_kind() {
                TokenKind::Eof => break,
                TokenKind::LAngleSlash => {
                    let name = self.peek_closing_name();
                    if self.open_elements.iter().any(|open| open == name) {
                        break;
                    }
                    let span = self.current().span;
                    let expected = self
                        .open_elements
                        .last()
                        .map(|n| n.to_string())
                        .unwrap_or_default();
                    self.error(
                        ParseErrorKind::MismatchedClosingTag {
                            expected,
                            found: name.to_string(),
                        },
                        span,
                    );
                    self.skip_closing_tag();
                }
                TokenKind::CommentOpen => {
                    nodes.push(TemplateNode::Comment(self.read_comment()));
                }
                TokenKind::LMustache => {
                    nodes.push(TemplateNode::Interpolation(self.parse_interpolation()));
                }
                TokenKind::LAngle if self.peek_kind(1) == TokenKind::Name => {
                    nodes.push(TemplateNode::Element(self.parse_element()));
                }
                _ => {
                    if let Some(text) = self.parse_text() {
                        nodes.push(TemplateNode::Text(text));
                    }
                }
            }
        }

        nodes
    }

    fn parse_element(&mut self) -> Element {
        let open = self.parse_open_tag();
        let tag = open.name.clone();
        let kind = element_kind(&tag);
        let attributes = open
            .attributes
            .into_iter()
            .map(classify_attribute)
            .collect();

        if open.self_closing || is_void_element(&tag) {
            return Element {
                span: open.span,
                tag,
                kind,
                attributes,
                children: Vec::new(),
                self_closing: open.self_closing,
            };
        }

        self.open_elements.push(tag.clone());
        let children = self.parse_children();
        self.open_elements.pop();

        let end = if self.check(TokenKind::LAngleSlash) && self.peek_closing_name() == tag {
            TextSize::from(self.skip_closing_tag() as u32)
        } else {
            self.error(
                ParseErrorKind::UnclosedTag {
                    tag_name: tag.to_string(),
                },
                open.span,
            );
            children.last().map(|n| n.span().end).unwrap_or(open.span.end)
        };

        Element {
            span: Span::new(open.span.start, end),
            tag,
            kind,
            attributes,
            children,
            self_closing: false,
        }
    }

    fn parse_interpolation(&mut self) -> Interpolation {
        let start = self.current().span.lo();
        let inner_start = self.current().span.hi();
        let (inner_end, end) = match self.find_from(inner_start, "}}") {
            Some(close) => (close, close + 2),
            None => {
                self.error(
                    ParseErrorKind::UnterminatedInterpolation,
                    Span::from_offsets(start, self.source.len()),
                );
                (self.source.len(), self.source.len())
            }
        };
        self.skip_to(end);

        let raw = &self.source[inner_start..inner_end];
        let leading = raw.len() - raw.trim_start().len();
        let content = raw.trim();
        let expr_start = inner_start + leading;

        Interpolation {
            span: Span::from_offsets(start, end),
            expression: Expression {
                span: Span::from_offsets(expr_start, expr_start + content.len()),
                content: content.to_string(),
            },
        }
    }

    fn read_comment(&mut self) -> Comment {
        let start = self.current().span.lo();
        let inner_start = self.current().span.hi();
        let (inner_end, end) = match self.find_from(inner_start, "-->") {
            Some(close) => (close, close + 3),
            None => (self.source.len(), self.source.len()),
        };
        self.skip_to(end);
        Comment {
            span: Span::from_offsets(start, end),
            value: self.source[inner_start..inner_end].to_string(),
        }
    }

    fn parse_text(&mut self) -> Option<Text> {
        let start = self.current().span.lo();
        let first_len = self.source[start..].chars().next()?.len_utf8();
        let search_from = start + first_len;
        let end = [self.find_from(search_from, "<"), self.find_from(search_from, "{{")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(self.source.len());
        self.skip_to(end);
        if self.current().span.lo() == start {
            // Never stall on a token the text scan could not move past.
            self.advance();
        }
        Some(Text {
            span: Span::from_offsets(start, end),
            value: self.source[start..end].to_string(),
        })
    }
}

/// Splits an attribute into a directive or keeps it static.
fn classify_attribute(attr: StaticAttribute) -> Attribute {
    let raw = attr.name.as_str();
    let (name, rest, mut modifiers): (&str, &str, Vec<SmolStr>) =
        if let Some(after) = raw.strip_prefix("v-") {
            let split = after.find([':', '.']).unwrap_or(after.len());
            let rest = &after[split..];
            (&after[..split], rest.strip_prefix(':').unwrap_or(rest), Vec::new())
        } else if let Some(after) = raw.strip_prefix(':') {
            ("bind", after, Vec::new())
        } else if let Some(after) = raw.strip_prefix('.') {
            ("bind", after, vec![SmolStr::new("prop")])
        } else if let Some(after) = raw.strip_prefix('@') {
            ("on", after, Vec::new())
        } else if let Some(after) = raw.strip_prefix('#') {
            ("slot", after, Vec::new())
        } else {
            return Attribute::Static(attr);
        };

    // Offset of `rest` inside the attribute name.
    let rest_offset = raw.len() - rest.len();
    let (arg, modifier_text) = if rest.starts_with('.') {
        (None, rest)
    } else if let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                let expr_start = attr.span.lo() + rest_offset + 1;
                let arg = DirectiveArg::Dynamic(Expression {
                    span: Span::from_offsets(expr_start, expr_start + close),
                    content: inner[..close].to_string(),
                });
                (Some(arg), &inner[close + 1..])
            }
            None => (Some(DirectiveArg::Static(SmolStr::new(rest))), ""),
        }
    } else if rest.is_empty() {
        (None, "")
    } else {
        let split = rest.find('.').unwrap_or(rest.len());
        (
            Some(DirectiveArg::Static(SmolStr::new(&rest[..split]))),
            &rest[split..],
        )
    };

    modifiers.extend(
        modifier_text
            .split('.')
            .filter(|m| !m.is_empty())
            .map(SmolStr::new),
    );

    Attribute::Directive(Directive {
        span: attr.span,
        name: SmolStr::new(name),
        raw_name: attr.name.clone(),
        arg,
        modifiers,
        expression: attr.value.map(|v| Expression {
            span: v.span,
            content: v.value,
        }),
    })
}
