//! AST types for Vue single-file components.
//!
//! A component document is split into top-level blocks. Script and style
//! blocks keep their raw content; the template block additionally carries a
//! node tree when its language is HTML.

use crate::Span;
use smol_str::SmolStr;

/// A split component document.
#[derive(Debug, Clone, Default)]
pub struct SfcDescriptor {
    /// The `<template>` block.
    pub template: Option<TemplateBlock>,
    /// The options-style `<script>` block.
    pub script: Option<ScriptBlock>,
    /// The `<script setup>` block.
    pub script_setup: Option<ScriptBlock>,
    /// All `<style>` blocks.
    pub styles: Vec<Block>,
    /// Any other top-level blocks (`<i18n>`, `<docs>`, ...).
    pub custom_blocks: Vec<Block>,
    /// The span of the entire document.
    pub span: Span,
}

impl SfcDescriptor {
    /// Script blocks in source order.
    pub fn scripts(&self) -> Vec<&ScriptBlock> {
        let mut scripts: Vec<&ScriptBlock> =
            self.script.iter().chain(self.script_setup.iter()).collect();
        scripts.sort_by_key(|s| s.content_span.start);
        scripts
    }
}

/// A script block.
#[derive(Debug, Clone)]
pub struct ScriptBlock {
    /// The span of the entire block including tags.
    pub span: Span,
    /// The span of the opening tag.
    pub open_tag_span: Span,
    /// The span of just the block content.
    pub content_span: Span,
    /// The raw content of the block.
    pub content: String,
    /// The declared language.
    pub lang: ScriptLang,
    /// Whether this is `<script setup>`.
    pub setup: bool,
    /// Attributes on the opening tag.
    pub attributes: Vec<StaticAttribute>,
}

impl ScriptBlock {
    /// Returns the `lang` attribute, if present.
    pub fn lang_attribute(&self) -> Option<&StaticAttribute> {
        self.attributes.iter().find(|a| a.name == "lang")
    }
}

/// The language of a script block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptLang {
    /// JavaScript (default).
    #[default]
    JavaScript,
    /// JavaScript with JSX (`lang="jsx"`).
    Jsx,
    /// TypeScript (`lang="ts"`).
    TypeScript,
    /// TypeScript with JSX (`lang="tsx"`).
    Tsx,
}

impl ScriptLang {
    /// Maps a `lang` attribute value to a script language.
    pub fn from_attribute(value: &str) -> Self {
        match value.trim() {
            "ts" | "typescript" => ScriptLang::TypeScript,
            "tsx" => ScriptLang::Tsx,
            "jsx" => ScriptLang::Jsx,
            _ => ScriptLang::JavaScript,
        }
    }

    /// Whether the block carries type annotations.
    pub fn is_typed(&self) -> bool {
        matches!(self, ScriptLang::TypeScript | ScriptLang::Tsx)
    }

    /// File extension used when the block is handled as a standalone module.
    pub fn extension(&self) -> &'static str {
        match self {
            ScriptLang::JavaScript => "js",
            ScriptLang::Jsx => "jsx",
            ScriptLang::TypeScript => "ts",
            ScriptLang::Tsx => "tsx",
        }
    }
}

/// A top-level block kept as raw content (style and custom blocks).
#[derive(Debug, Clone)]
pub struct Block {
    /// The block's tag name.
    pub tag: SmolStr,
    /// The span of the entire block including tags.
    pub span: Span,
    /// The span of just the block content.
    pub content_span: Span,
    /// The raw content of the block.
    pub content: String,
    /// Attributes on the opening tag.
    pub attributes: Vec<StaticAttribute>,
}

/// The `<template>` block.
#[derive(Debug, Clone)]
pub struct TemplateBlock {
    /// The span of the entire block including tags.
    pub span: Span,
    /// The span of just the block content.
    pub content_span: Span,
    /// The raw content of the block.
    pub content: String,
    /// The `lang` attribute value, if any.
    pub lang: Option<SmolStr>,
    /// Attributes on the opening tag.
    pub attributes: Vec<StaticAttribute>,
    /// The node tree; `None` for non-HTML template languages.
    pub ast: Option<Fragment>,
}

/// A sequence of template nodes.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    /// The child nodes.
    pub nodes: Vec<TemplateNode>,
    /// The span of the fragment.
    pub span: Span,
}

/// A node in the template.
#[derive(Debug, Clone)]
pub enum TemplateNode {
    /// An element or component.
    Element(Element),
    /// Text content.
    Text(Text),
    /// A `{{ expr }}` interpolation.
    Interpolation(Interpolation),
    /// An HTML comment.
    Comment(Comment),
}

impl TemplateNode {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Element(n) => n.span,
            TemplateNode::Text(n) => n.span,
            TemplateNode::Interpolation(n) => n.span,
            TemplateNode::Comment(n) => n.span,
        }
    }

    /// Returns the child nodes of this node.
    pub fn children(&self) -> &[TemplateNode] {
        match self {
            TemplateNode::Element(n) => &n.children,
            _ => &[],
        }
    }
}

/// An element in the template.
#[derive(Debug, Clone)]
pub struct Element {
    /// The span of the element.
    pub span: Span,
    /// The tag name as written.
    pub tag: SmolStr,
    /// How the tag resolves.
    pub kind: ElementKind,
    /// The attributes and directives.
    pub attributes: Vec<Attribute>,
    /// The child nodes.
    pub children: Vec<TemplateNode>,
    /// Whether this is a self-closing tag.
    pub self_closing: bool,
}

/// How an element's tag resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A native HTML, SVG or MathML element.
    Element,
    /// A component resolved from script bindings or registration.
    Component,
    /// A `<template>` wrapper.
    Template,
    /// A `<slot>` outlet.
    Slot,
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A plain attribute (`class="a"`).
    Static(StaticAttribute),
    /// A directive (`v-if`, `:prop`, `@event`, `#slot`, ...).
    Directive(Directive),
}

impl Attribute {
    /// Returns the span of this attribute.
    pub fn span(&self) -> Span {
        match self {
            Attribute::Static(a) => a.span,
            Attribute::Directive(d) => d.span,
        }
    }
}

/// A plain attribute.
#[derive(Debug, Clone)]
pub struct StaticAttribute {
    /// The span of the whole attribute.
    pub span: Span,
    /// The attribute name.
    pub name: SmolStr,
    /// The value, if one was given.
    pub value: Option<TextValue>,
}

/// A text value with its span.
#[derive(Debug, Clone)]
pub struct TextValue {
    /// The span of the value (without quotes).
    pub span: Span,
    /// The text.
    pub value: String,
}

/// A directive attribute.
#[derive(Debug, Clone)]
pub struct Directive {
    /// The span of the whole attribute.
    pub span: Span,
    /// The normalized directive name (`bind`, `on`, `slot`, `if`, `for`, ...).
    pub name: SmolStr,
    /// The attribute name as written.
    pub raw_name: SmolStr,
    /// The directive argument.
    pub arg: Option<DirectiveArg>,
    /// Modifiers (`.stop`, `.prevent`, ...).
    pub modifiers: Vec<SmolStr>,
    /// The value expression.
    pub expression: Option<Expression>,
}

/// A directive argument.
#[derive(Debug, Clone)]
pub enum DirectiveArg {
    /// A static argument (`:title`).
    Static(SmolStr),
    /// A dynamic argument (`:[key]`).
    Dynamic(Expression),
}

/// A JavaScript expression embedded in the template.
#[derive(Debug, Clone)]
pub struct Expression {
    /// The span of the expression text.
    pub span: Span,
    /// The expression text.
    pub content: String,
}

/// Text content.
#[derive(Debug, Clone)]
pub struct Text {
    /// The span of the text.
    pub span: Span,
    /// The text.
    pub value: String,
}

/// A `{{ expr }}` interpolation.
#[derive(Debug, Clone)]
pub struct Interpolation {
    /// The span including the braces.
    pub span: Span,
    /// The inner expression.
    pub expression: Expression,
}

/// An HTML comment.
#[derive(Debug, Clone)]
pub struct Comment {
    /// The span including the delimiters.
    pub span: Span,
    /// The comment text.
    pub value: String,
}
