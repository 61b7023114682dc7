//! The erasure walk over statements, expressions and patterns.

use super::Eraser;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

impl Eraser<'_> {
    /// Handles a declaration. Returns `true` when the declaration was fully
    /// handled and must not be walked further.
    fn erase_decl(&mut self, decl: &Decl, outer: Span) -> bool {
        match decl {
            Decl::TsInterface(_) | Decl::TsTypeAlias(_) => {
                self.remove_type_only(outer);
                true
            }
            Decl::Fn(f) if f.declare || f.function.body.is_none() => {
                self.remove_type_only(outer);
                true
            }
            Decl::Var(v) if v.declare => {
                self.remove_construct(outer);
                true
            }
            Decl::Class(c) if c.declare => {
                self.remove_construct(outer);
                true
            }
            Decl::Class(c) => {
                if c.class.is_abstract {
                    self.remove_abstract_keyword(c.class.span, Some(&c.ident));
                }
                false
            }
            Decl::TsEnum(e) if e.declare => {
                self.remove_construct(outer);
                true
            }
            Decl::TsEnum(e) => {
                self.lower_enum(e);
                true
            }
            Decl::TsModule(m) => {
                if m.declare
                    || m.global
                    || matches!(m.id, TsModuleName::Str(_))
                    || is_type_only_namespace(m.body.as_ref())
                {
                    self.remove_construct(outer);
                } else {
                    let name = match &m.id {
                        TsModuleName::Ident(id) => id.sym.to_string(),
                        TsModuleName::Str(s) => s.value.to_string_lossy().into_owned(),
                    };
                    self.fail(format!("namespace `{}` contains runtime code", name));
                }
                true
            }
            Decl::Fn(_) | Decl::Var(_) | Decl::Using(_) => false,
        }
    }

    fn erase_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => self.erase_import(import),
            ModuleDecl::ExportDecl(export) => {
                if !self.erase_decl(&export.decl, export.span) {
                    export.decl.visit_with(self);
                }
            }
            ModuleDecl::ExportNamed(named) => self.erase_named_export(named),
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::TsInterfaceDecl(_) => self.remove_type_only(export.span),
                DefaultDecl::Fn(f) if f.function.body.is_none() => {
                    self.remove_type_only(export.span)
                }
                DefaultDecl::Class(class) => {
                    if class.class.is_abstract {
                        self.remove_abstract_keyword(class.class.span, class.ident.as_ref());
                    }
                    class.visit_with(self);
                }
                DefaultDecl::Fn(f) => f.visit_with(self),
            },
            ModuleDecl::ExportDefaultExpr(export) => {
                if let Expr::Ident(ident) = &*export.expr {
                    if self.bindings.is_type_only(&ident.sym) {
                        self.remove_type_only(export.span);
                        return;
                    }
                }
                export.visit_children_with(self);
            }
            ModuleDecl::ExportAll(all) if all.type_only => self.remove_type_only(all.span),
            ModuleDecl::TsImportEquals(decl) => self.erase_import_equals(decl),
            ModuleDecl::TsExportAssignment(_) => self.fail("`export =` assignment"),
            ModuleDecl::TsNamespaceExport(decl) => self.remove_type_only(decl.span),
            other => other.visit_children_with(self),
        }
    }

    /// Removes `abstract` from `abstract class`.
    fn remove_abstract_keyword(&mut self, class_span: Span, ident: Option<&Ident>) {
        let lo = self.lo(class_span);
        if self.text()[lo..].starts_with("abstract") {
            let next = self.skip_ws_forward(lo + "abstract".len());
            self.remove(lo..next);
            return;
        }
        let class_kw = match ident {
            Some(ident) => self.word_before(self.lo(ident.span)).map(|w| w.start),
            None => Some(lo),
        };
        if let Some(class_kw) = class_kw {
            self.remove_keyword_before(class_kw, "abstract");
        }
    }

    /// Offset of the colon that starts a type annotation.
    fn type_ann_colon(&self, ann: &TsTypeAnn) -> usize {
        let lo = self.lo(ann.span);
        if self.text()[lo..].starts_with(':') {
            return lo;
        }
        let before = self.skip_ws_back(lo);
        if before > 0 && self.text()[..before].ends_with(':') {
            before - 1
        } else {
            lo
        }
    }

    pub(super) fn erase_type_ann(&mut self, ann: &TsTypeAnn) {
        let colon = self.type_ann_colon(ann);
        let start = self.skip_blanks_back(colon);
        let end = self.hi(ann.span);
        self.remove(start..end);
    }

    /// End of a pattern including its type annotation.
    fn pat_end(&self, pat: &Pat) -> usize {
        let ann = match pat {
            Pat::Ident(b) => b.type_ann.as_ref(),
            Pat::Array(a) => a.type_ann.as_ref(),
            Pat::Object(o) => o.type_ann.as_ref(),
            Pat::Rest(r) => r.type_ann.as_ref(),
            _ => None,
        };
        let end = self.hi(pat.span());
        ann.map_or(end, |ann| end.max(self.hi(ann.span)))
    }

    /// Removes a leading `this` parameter and its separator.
    fn remove_this_param(&mut self, params: &[Param]) {
        let Some(first) = params.first() else {
            return;
        };
        let start = self.lo(first.span);
        let end = match params.get(1) {
            Some(next) => self.lo(next.span),
            None => {
                let end = self.hi(first.span).max(self.pat_end(&first.pat));
                let after = self.skip_ws_forward(end);
                if self.text()[after..].starts_with(',') {
                    after + 1
                } else {
                    end
                }
            }
        };
        self.remove(start..end);
    }

    /// Removes the `as T`, `satisfies T` or `!` suffix of `outer`. Comments
    /// between `expr` and the operator stay.
    fn remove_suffix(&mut self, expr: &Expr, outer: Span) {
        let expr_end = self.hi(expr.span());
        let end = self.hi(outer);
        let operator = self.skip_trivia_forward(expr_end).min(end);
        let start = self.skip_ws_back(operator).max(expr_end);
        self.remove(start..end);
    }

    /// First offset at or after `pos` outside whitespace and comments.
    fn skip_trivia_forward(&self, mut pos: usize) -> usize {
        loop {
            pos = self.skip_ws_forward(pos);
            match self.parsed.comments().iter().find(|c| c.range.start == pos) {
                Some(comment) => pos = comment.range.end,
                None => return pos,
            }
        }
    }
}

fn is_this_param(pat: &Pat) -> bool {
    matches!(pat, Pat::Ident(b) if &*b.id.sym == "this")
}

/// Whether a namespace body declares nothing that exists at runtime.
pub(super) fn is_type_only_namespace(body: Option<&TsNamespaceBody>) -> bool {
    match body {
        None => true,
        Some(TsNamespaceBody::TsModuleBlock(block)) => block.body.iter().all(is_type_only_item),
        Some(TsNamespaceBody::TsNamespaceDecl(decl)) => is_type_only_namespace(Some(&decl.body)),
    }
}

fn is_type_only_item(item: &ModuleItem) -> bool {
    match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => is_type_only_decl(decl),
        ModuleItem::Stmt(Stmt::Empty(_)) => true,
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => is_type_only_decl(&export.decl),
        ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => named.type_only,
        ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => import.type_only,
        ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(decl)) => decl.is_type_only,
        _ => false,
    }
}

fn is_type_only_decl(decl: &Decl) -> bool {
    match decl {
        Decl::TsInterface(_) | Decl::TsTypeAlias(_) => true,
        Decl::Var(v) => v.declare,
        Decl::Fn(f) => f.declare || f.function.body.is_none(),
        Decl::Class(c) => c.declare,
        Decl::TsEnum(e) => e.declare,
        Decl::TsModule(m) => m.declare || is_type_only_namespace(m.body.as_ref()),
        Decl::Using(_) => false,
    }
}

impl Visit for Eraser<'_> {
    fn visit_module_item(&mut self, item: &ModuleItem) {
        match item {
            ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
            ModuleItem::ModuleDecl(decl) => self.erase_module_decl(decl),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Decl(decl) = stmt {
            if self.erase_decl(decl, stmt.span()) {
                return;
            }
        }
        stmt.visit_children_with(self);
    }

    fn visit_class(&mut self, class: &Class) {
        self.erase_class(class);
    }

    fn visit_function(&mut self, function: &Function) {
        if function.params.first().is_some_and(|p| is_this_param(&p.pat)) {
            self.remove_this_param(&function.params);
        }
        function.visit_children_with(self);
    }

    fn visit_setter_prop(&mut self, setter: &SetterProp) {
        if let Some(this_param) = &setter.this_param {
            let start = self.lo(this_param.span());
            let end = self.lo(setter.param.span());
            self.remove(start..end);
        }
        setter.visit_children_with(self);
    }

    fn visit_binding_ident(&mut self, binding: &BindingIdent) {
        if binding.id.optional {
            let name_end = self.lo(binding.id.span) + binding.id.sym.len();
            self.remove_marker_after(name_end, '?');
        }
        binding.visit_children_with(self);
    }

    fn visit_object_pat(&mut self, pat: &ObjectPat) {
        if pat.optional {
            if let Some(ann) = &pat.type_ann {
                let colon = self.type_ann_colon(ann);
                self.remove_marker_before(colon, '?');
            }
        }
        pat.visit_children_with(self);
    }

    fn visit_array_pat(&mut self, pat: &ArrayPat) {
        if pat.optional {
            if let Some(ann) = &pat.type_ann {
                let colon = self.type_ann_colon(ann);
                self.remove_marker_before(colon, '?');
            }
        }
        pat.visit_children_with(self);
    }

    fn visit_var_declarator(&mut self, declarator: &VarDeclarator) {
        if declarator.definite {
            if let Pat::Ident(binding) = &declarator.name {
                let name_end = self.lo(binding.id.span) + binding.id.sym.len();
                self.remove_marker_after(name_end, '!');
            }
        }
        declarator.visit_children_with(self);
    }

    fn visit_ts_type_ann(&mut self, ann: &TsTypeAnn) {
        self.erase_type_ann(ann);
    }

    fn visit_ts_type_param_decl(&mut self, params: &TsTypeParamDecl) {
        self.remove_span(params.span);
    }

    fn visit_ts_type_param_instantiation(&mut self, args: &TsTypeParamInstantiation) {
        self.remove_span(args.span);
    }

    fn visit_ts_type(&mut self, _: &TsType) {}

    fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}

    fn visit_ts_as_expr(&mut self, expr: &TsAsExpr) {
        self.remove_suffix(&expr.expr, expr.span);
        expr.expr.visit_with(self);
    }

    fn visit_ts_satisfies_expr(&mut self, expr: &TsSatisfiesExpr) {
        self.remove_suffix(&expr.expr, expr.span);
        expr.expr.visit_with(self);
    }

    fn visit_ts_non_null_expr(&mut self, expr: &TsNonNullExpr) {
        self.remove_suffix(&expr.expr, expr.span);
        expr.expr.visit_with(self);
    }

    fn visit_ts_const_assertion(&mut self, expr: &TsConstAssertion) {
        let lo = self.lo(expr.span);
        let expr_lo = self.lo(expr.expr.span());
        if lo < expr_lo {
            // `<const>x`
            self.remove(lo..expr_lo);
        } else {
            self.remove_suffix(&expr.expr, expr.span);
        }
        expr.expr.visit_with(self);
    }

    fn visit_ts_type_assertion(&mut self, expr: &TsTypeAssertion) {
        let start = self.lo(expr.span);
        let end = self.lo(expr.expr.span());
        self.remove(start..end);
        expr.expr.visit_with(self);
    }

    fn visit_ts_instantiation(&mut self, expr: &TsInstantiation) {
        self.remove_span(expr.type_args.span);
        expr.expr.visit_with(self);
    }
}
