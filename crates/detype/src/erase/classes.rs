//! Class bodies: modifiers, type-only members and parameter properties.

use super::Eraser;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::VisitWith;

/// Words that may lead a class member or parameter property.
const MEMBER_MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "readonly",
    "override",
    "abstract",
    "declare",
    "static",
];

impl Eraser<'_> {
    pub(super) fn erase_class(&mut self, class: &Class) {
        class.decorators.visit_with(self);
        if let Some(params) = &class.type_params {
            self.remove_span(params.span);
        }
        class.super_class.visit_with(self);
        if let Some(args) = &class.super_type_params {
            self.remove_span(args.span);
        }
        if let (Some(first), Some(last)) = (class.implements.first(), class.implements.last()) {
            if let Some(kw) = self.word_before(self.lo(first.span)) {
                if &self.text()[kw.clone()] == "implements" {
                    let start = self.skip_ws_back(kw.start);
                    let end = self.hi(last.span);
                    self.remove(start..end);
                }
            }
        }
        for member in &class.body {
            self.erase_class_member(member);
        }
    }

    fn erase_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Constructor(ctor) => {
                if ctor.body.is_none() {
                    self.remove_member(ctor.span);
                    return;
                }
                let start = self.modifier_start(ctor.span, &[]);
                self.remove_modifiers(start..self.lo(ctor.key.span()));
                self.erase_constructor(ctor);
            }
            ClassMember::Method(method) => {
                if method.is_abstract || method.function.body.is_none() {
                    self.remove_member(method.span);
                    return;
                }
                let start = self.modifier_start(method.span, &method.function.decorators);
                self.remove_modifiers(start..self.lo(method.key.span()));
                if method.is_optional {
                    self.remove_marker_after(self.hi(method.key.span()), '?');
                }
                method.key.visit_with(self);
                method.function.visit_with(self);
            }
            ClassMember::PrivateMethod(method) => {
                if method.is_abstract || method.function.body.is_none() {
                    self.remove_member(method.span);
                    return;
                }
                let start = self.modifier_start(method.span, &method.function.decorators);
                self.remove_modifiers(start..self.lo(method.key.span));
                if method.is_optional {
                    self.remove_marker_after(self.hi(method.key.span), '?');
                }
                method.function.visit_with(self);
            }
            ClassMember::ClassProp(prop) => {
                let type_only_field =
                    prop.value.is_none() && prop.type_ann.is_some() && prop.decorators.is_empty();
                if prop.declare || prop.is_abstract || type_only_field {
                    self.remove_member(prop.span);
                    return;
                }
                let start = self.modifier_start(prop.span, &prop.decorators);
                self.remove_modifiers(start..self.lo(prop.key.span()));
                let key_end = self.hi(prop.key.span());
                if prop.is_optional {
                    self.remove_marker_after(key_end, '?');
                }
                if prop.definite {
                    self.remove_marker_after(key_end, '!');
                }
                prop.decorators.visit_with(self);
                prop.key.visit_with(self);
                prop.type_ann.visit_with(self);
                prop.value.visit_with(self);
            }
            ClassMember::PrivateProp(prop) => {
                let start = self.modifier_start(prop.span, &prop.decorators);
                self.remove_modifiers(start..self.lo(prop.key.span));
                let key_end = self.hi(prop.key.span);
                if prop.is_optional {
                    self.remove_marker_after(key_end, '?');
                }
                if prop.definite {
                    self.remove_marker_after(key_end, '!');
                }
                prop.decorators.visit_with(self);
                prop.type_ann.visit_with(self);
                prop.value.visit_with(self);
            }
            ClassMember::AutoAccessor(accessor) => {
                if accessor.is_abstract {
                    self.remove_member(accessor.span);
                    return;
                }
                let key_span = match &accessor.key {
                    Key::Private(name) => name.span,
                    Key::Public(name) => name.span(),
                };
                let start = self.modifier_start(accessor.span, &accessor.decorators);
                self.remove_modifiers(start..self.lo(key_span));
                if accessor.definite {
                    self.remove_marker_after(self.hi(key_span), '!');
                }
                accessor.decorators.visit_with(self);
                accessor.type_ann.visit_with(self);
                accessor.value.visit_with(self);
            }
            ClassMember::TsIndexSignature(sig) => self.remove_member(sig.span),
            ClassMember::StaticBlock(block) => block.visit_with(self),
            ClassMember::Empty(_) => {}
        }
    }

    /// Where a member's modifier list begins: after its decorators. The
    /// member span already covers its modifiers, so the only words taken from
    /// before it are modifiers that begin the member on the same line.
    fn modifier_start(&self, span: Span, decorators: &[Decorator]) -> usize {
        let lo = self.lo(span);
        let start = decorators
            .last()
            .map_or(lo, |d| self.hi(d.span).max(lo));
        self.leading_keywords_start(start, MEMBER_MODIFIERS)
    }

    /// Removes a whole class member with its modifiers and semicolon.
    fn remove_member(&mut self, span: Span) {
        let text = self.text();
        let start = self.modifier_start(span, &[]);
        let mut end = self.hi(span);
        let after = end
            + text[end..]
                .find(|c: char| c != ' ' && c != '\t')
                .unwrap_or(text.len() - end);
        if text[after..].starts_with(';') {
            end = after + 1;
        }
        self.remove_type_only_range(start..end);
    }

    fn erase_constructor(&mut self, ctor: &Constructor) {
        let mut assigned = Vec::new();
        for param in &ctor.params {
            match param {
                ParamOrTsParamProp::TsParamProp(prop) => {
                    let (inner_lo, name) = match &prop.param {
                        TsParamPropParam::Ident(binding) => {
                            (self.lo(binding.id.span), Some(binding.id.sym.to_string()))
                        }
                        TsParamPropParam::Assign(assign) => {
                            let name = match &*assign.left {
                                Pat::Ident(binding) => Some(binding.id.sym.to_string()),
                                _ => None,
                            };
                            (self.lo(assign.span), name)
                        }
                    };
                    let start = self.modifier_start(prop.span, &prop.decorators);
                    self.remove_modifiers(start..inner_lo);
                    prop.decorators.visit_with(self);
                    prop.param.visit_with(self);
                    assigned.extend(name);
                }
                ParamOrTsParamProp::Param(param) => param.visit_with(self),
            }
        }
        if let Some(body) = &ctor.body {
            self.insert_param_assignments(ctor, body, &assigned);
            body.visit_with(self);
        }
    }

    /// Writes `this.name = name;` for each parameter property.
    fn insert_param_assignments(&mut self, ctor: &Constructor, body: &BlockStmt, names: &[String]) {
        if names.is_empty() {
            return;
        }
        if let Some(call) = body.stmts.iter().find(|s| is_super_call(s)) {
            let indent = self.line_indent(self.lo(call.span()));
            let text: String = names
                .iter()
                .map(|n| format!("\n{indent}this.{n} = {n};"))
                .collect();
            self.edits.insert(self.hi(call.span()), text);
        } else if let Some(first) = body.stmts.first() {
            let indent = self.line_indent(self.lo(first.span()));
            let text: String = names
                .iter()
                .map(|n| format!("this.{n} = {n};\n{indent}"))
                .collect();
            self.edits.insert(self.lo(first.span()), text);
        } else {
            let indent = self.line_indent(self.lo(ctor.span));
            let mut text: String = names
                .iter()
                .map(|n| format!("\n{indent}  this.{n} = {n};"))
                .collect();
            text.push('\n');
            text.push_str(indent);
            let lo = self.lo(body.span) + 1;
            let hi = self.hi(body.span).saturating_sub(1).max(lo);
            self.edits.replace(lo..hi, text);
        }
    }
}

fn is_super_call(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Expr(expr) => matches!(
            &*expr.expr,
            Expr::Call(CallExpr {
                callee: Callee::Super(_),
                ..
            })
        ),
        _ => false,
    }
}
