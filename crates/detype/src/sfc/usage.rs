//! Names the template reads from `<script setup>`.
//!
//! Import elision only sees the script, so a binding used by the template
//! alone would be dropped. The collected names are appended to the setup
//! script as a throwaway expression before erasure and cut off afterwards.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use sfc_parser::{Attribute, DirectiveArg, Element, ElementKind, Fragment, TemplateNode};
use smol_str::SmolStr;

/// Marks where the appended usage expression starts.
pub(crate) const USAGE_SENTINEL: &str = "/* @detype: remove-after-this */";

static FOR_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+(?:of|in)\s+").unwrap());
static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][\w$]*").unwrap());

const RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const BUILTIN_DIRECTIVES: &[&str] = &[
    "bind", "on", "if", "else-if", "else", "for", "show", "model", "slot", "html", "text", "once",
    "memo", "cloak", "pre", "is",
];

/// Collects the names a template may read from script bindings.
pub(crate) fn template_references(template: &Fragment) -> IndexSet<SmolStr> {
    let mut names = IndexSet::new();
    walk(&template.nodes, &mut names);
    names
}

fn walk(nodes: &[TemplateNode], names: &mut IndexSet<SmolStr>) {
    for node in nodes {
        match node {
            TemplateNode::Interpolation(interpolation) => {
                collect_identifiers(&interpolation.expression.content, names)
            }
            TemplateNode::Element(element) => {
                visit_element(element, names);
                walk(&element.children, names);
            }
            TemplateNode::Text(_) | TemplateNode::Comment(_) => {}
        }
    }
}

fn visit_element(element: &Element, names: &mut IndexSet<SmolStr>) {
    if element.kind == ElementKind::Component {
        component_names(&element.tag, names);
    }
    for attribute in &element.attributes {
        let Attribute::Directive(directive) = attribute else {
            continue;
        };
        if let Some(DirectiveArg::Dynamic(arg)) = &directive.arg {
            collect_identifiers(&arg.content, names);
        }
        if !BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
            insert(names, format!("v{}", pascal_case(&directive.name)));
        }
        match (directive.name.as_str(), &directive.expression) {
            // Slot props are declarations, not reads.
            ("slot", _) => {}
            ("for", Some(expr)) => {
                let parts: Vec<&str> = FOR_SPLIT_RE.splitn(&expr.content, 2).collect();
                let source = parts.last().copied().unwrap_or(&expr.content);
                collect_identifiers(source, names);
            }
            // `:id` is short for `:id="id"`.
            ("bind", None) => {
                if let Some(DirectiveArg::Static(arg)) = &directive.arg {
                    insert(names, camelize(arg));
                }
            }
            (_, Some(expr)) => collect_identifiers(&expr.content, names),
            (_, None) => {}
        }
    }
}

/// Binding names a component tag can resolve to.
fn component_names(tag: &str, names: &mut IndexSet<SmolStr>) {
    // `<Foo.Bar>` reads `Foo`.
    let root = tag.split('.').next().unwrap_or(tag);
    if root.contains('-') {
        let camel = camelize(root);
        insert(names, pascal_case(&camel));
        insert(names, camel);
    } else {
        insert(names, root.to_string());
    }
}

fn insert(names: &mut IndexSet<SmolStr>, name: String) {
    if IDENT_RE.find(&name).is_some_and(|m| m.as_str() == name) && !RESERVED.contains(&name.as_str()) {
        names.insert(SmolStr::new(name));
    }
}

/// `foo-bar` to `fooBar`.
fn camelize(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper = false;
    for c in s.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn pascal_case(s: &str) -> String {
    let camel = camelize(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => camel,
    }
}

/// Adds every identifier an expression reads, skipping string contents,
/// property names after `.` and keywords.
fn collect_identifiers(expr: &str, names: &mut IndexSet<SmolStr>) {
    let code = blank_strings(expr);
    let bytes = code.as_bytes();
    for m in IDENT_RE.find_iter(&code) {
        let before = code[..m.start()].trim_end();
        let prev = before.as_bytes().last().copied();
        let is_member = prev == Some(b'.') && !before.ends_with("...");
        let glued = m.start() > 0 && {
            let b = bytes[m.start() - 1];
            b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
        };
        if !is_member && !glued {
            insert(names, m.as_str().to_string());
        }
    }
}

/// Replaces the contents of string and template literals with spaces,
/// keeping `${}` substitutions as code.
fn blank_strings(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut chars = expr.chars().peekable();
    // Brace depth of each open `${` inside a template literal.
    let mut templates: Vec<usize> = Vec::new();
    let mut depth = 0usize;
    let mut in_template = false;

    while let Some(c) = chars.next() {
        if in_template {
            match c {
                '\\' => {
                    out.push(' ');
                    if chars.next().is_some() {
                        out.push(' ');
                    }
                }
                '`' => {
                    out.push('`');
                    in_template = false;
                }
                '$' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push_str("${");
                    templates.push(depth);
                    depth += 1;
                    in_template = false;
                }
                _ => out.push(' '),
            }
            continue;
        }
        match c {
            '\'' | '"' => {
                out.push(c);
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        chars.next();
                        out.push_str("  ");
                    } else if inner == c {
                        out.push(c);
                        break;
                    } else {
                        out.push(' ');
                    }
                }
            }
            '`' => {
                out.push('`');
                in_template = true;
            }
            '{' => {
                depth += 1;
                out.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(c);
                if templates.last() == Some(&depth) {
                    templates.pop();
                    in_template = true;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// The expression appended to the setup script, or `None` when the
/// template reads nothing.
pub(crate) fn usage_suffix(names: &IndexSet<SmolStr>) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let list: Vec<&str> = names.iter().map(SmolStr::as_str).collect();
    Some(format!("{};[{}];", USAGE_SENTINEL, list.join(", ")))
}
