//! Value references and type-only bindings.
//!
//! An import binding that is never read as a value is elided along with its
//! specifier, so reads have to be collected without descending into types.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Names read as values somewhere in a module.
#[derive(Debug, Default)]
pub struct ValueReferences {
    names: FxHashSet<SmolStr>,
}

impl ValueReferences {
    /// Collects the value references of `module`.
    pub fn collect(module: &Module) -> Self {
        let mut collector = ReferenceCollector::default();
        module.visit_with(&mut collector);
        if collector.has_jsx {
            // Classic JSX runtime reads the pragma binding implicitly.
            collector.names.insert(SmolStr::new_static("React"));
        }
        Self {
            names: collector.names,
        }
    }

    /// Whether `name` is read as a value.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[derive(Default)]
struct ReferenceCollector {
    names: FxHashSet<SmolStr>,
    has_jsx: bool,
}

impl Visit for ReferenceCollector {
    fn visit_ident(&mut self, ident: &Ident) {
        self.names.insert(SmolStr::new(&ident.sym));
    }

    fn visit_import_decl(&mut self, _: &ImportDecl) {}

    fn visit_ts_import_equals_decl(&mut self, decl: &TsImportEqualsDecl) {
        if decl.is_type_only {
            return;
        }
        if let TsModuleRef::TsEntityName(name) = &decl.module_ref {
            self.names.insert(entity_root(name));
        }
    }

    fn visit_ts_type(&mut self, _: &TsType) {}
    fn visit_ts_type_ann(&mut self, _: &TsTypeAnn) {}
    fn visit_ts_type_param_decl(&mut self, _: &TsTypeParamDecl) {}
    fn visit_ts_type_param_instantiation(&mut self, _: &TsTypeParamInstantiation) {}
    fn visit_ts_interface_decl(&mut self, _: &TsInterfaceDecl) {}
    fn visit_ts_type_alias_decl(&mut self, _: &TsTypeAliasDecl) {}
    fn visit_ts_expr_with_type_args(&mut self, _: &TsExprWithTypeArgs) {}
    fn visit_ts_index_signature(&mut self, _: &TsIndexSignature) {}

    fn visit_fn_decl(&mut self, decl: &FnDecl) {
        if !decl.declare {
            decl.visit_children_with(self);
        }
    }

    fn visit_function(&mut self, function: &Function) {
        if function.body.is_some() {
            function.visit_children_with(self);
        }
    }

    fn visit_var_decl(&mut self, decl: &VarDecl) {
        if !decl.declare {
            decl.visit_children_with(self);
        }
    }

    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        if !decl.declare {
            decl.visit_children_with(self);
        }
    }

    fn visit_ts_enum_decl(&mut self, decl: &TsEnumDecl) {
        if !decl.declare {
            decl.visit_children_with(self);
        }
    }

    fn visit_ts_module_decl(&mut self, decl: &TsModuleDecl) {
        if !decl.declare && !decl.global {
            decl.visit_children_with(self);
        }
    }

    fn visit_jsx_opening_element(&mut self, element: &JSXOpeningElement) {
        self.has_jsx = true;
        element.visit_children_with(self);
    }

    fn visit_jsx_fragment(&mut self, fragment: &JSXFragment) {
        self.has_jsx = true;
        fragment.visit_children_with(self);
    }
}

/// Leftmost identifier of `A.B.C`.
fn entity_root(name: &TsEntityName) -> SmolStr {
    match name {
        TsEntityName::Ident(ident) => SmolStr::new(&ident.sym),
        TsEntityName::TsQualifiedName(qualified) => entity_root(&qualified.left),
    }
}

/// Top-level names declared as types, and as values.
#[derive(Debug, Default)]
pub struct TopLevelBindings {
    types: FxHashSet<SmolStr>,
    values: FxHashSet<SmolStr>,
}

impl TopLevelBindings {
    /// Collects the top-level bindings of `module`.
    pub fn collect(module: &Module) -> Self {
        let mut bindings = Self::default();
        for item in &module.body {
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => bindings.add_decl(decl),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    bindings.add_decl(&export.decl)
                }
                ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                    for specifier in &import.specifiers {
                        let (local, type_only) = match specifier {
                            ImportSpecifier::Named(named) => (&named.local, named.is_type_only),
                            ImportSpecifier::Default(default) => (&default.local, false),
                            ImportSpecifier::Namespace(namespace) => (&namespace.local, false),
                        };
                        let name = SmolStr::new(&local.sym);
                        if import.type_only || type_only {
                            bindings.types.insert(name);
                        } else {
                            bindings.values.insert(name);
                        }
                    }
                }
                ModuleItem::ModuleDecl(ModuleDecl::TsImportEquals(decl)) => {
                    let name = SmolStr::new(&decl.id.sym);
                    if decl.is_type_only {
                        bindings.types.insert(name);
                    } else {
                        bindings.values.insert(name);
                    }
                }
                _ => {}
            }
        }
        bindings
    }

    fn add_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::TsInterface(d) => {
                self.types.insert(SmolStr::new(&d.id.sym));
            }
            Decl::TsTypeAlias(d) => {
                self.types.insert(SmolStr::new(&d.id.sym));
            }
            Decl::Class(d) => {
                self.values.insert(SmolStr::new(&d.ident.sym));
            }
            Decl::Fn(d) => {
                self.values.insert(SmolStr::new(&d.ident.sym));
            }
            Decl::TsEnum(d) => {
                self.values.insert(SmolStr::new(&d.id.sym));
            }
            Decl::TsModule(d) => {
                if let TsModuleName::Ident(id) = &d.id {
                    self.values.insert(SmolStr::new(&id.sym));
                }
            }
            Decl::Var(d) => {
                for declarator in &d.decls {
                    collect_pat_names(&declarator.name, &mut self.values);
                }
            }
            Decl::Using(d) => {
                for declarator in &d.decls {
                    collect_pat_names(&declarator.name, &mut self.values);
                }
            }
        }
    }

    /// Whether `name` is declared only as a type.
    pub fn is_type_only(&self, name: &str) -> bool {
        self.types.contains(name) && !self.values.contains(name)
    }
}

fn collect_pat_names(pat: &Pat, names: &mut FxHashSet<SmolStr>) {
    match pat {
        Pat::Ident(binding) => {
            names.insert(SmolStr::new(&binding.id.sym));
        }
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_names(elem, names);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat_names(&kv.value, names),
                    ObjectPatProp::Assign(assign) => {
                        names.insert(SmolStr::new(&assign.key.sym));
                    }
                    ObjectPatProp::Rest(rest) => collect_pat_names(&rest.arg, names),
                }
            }
        }
        Pat::Rest(rest) => collect_pat_names(&rest.arg, names),
        Pat::Assign(assign) => collect_pat_names(&assign.left, names),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;

    fn module(source: &str, file_name: &str) -> Module {
        parse_module(source.to_string(), file_name)
            .unwrap()
            .module()
            .clone()
    }

    #[test]
    fn test_type_positions_are_not_references() {
        let refs = ValueReferences::collect(&module(
            "import { A, B, C } from './x';\nlet a: A = new B();\ntype T = typeof C;\n",
            "a.ts",
        ));
        assert!(!refs.contains("A"));
        assert!(refs.contains("B"));
        assert!(!refs.contains("C"));
    }

    #[test]
    fn test_jsx_keeps_react() {
        let refs = ValueReferences::collect(&module(
            "import React from 'react';\nexport const el = <div />;\n",
            "a.tsx",
        ));
        assert!(refs.contains("React"));
    }

    #[test]
    fn test_export_specifier_is_a_reference() {
        let refs = ValueReferences::collect(&module(
            "import { x } from './x';\nexport { x };\n",
            "a.ts",
        ));
        assert!(refs.contains("x"));
    }

    #[test]
    fn test_top_level_type_bindings() {
        let bindings = TopLevelBindings::collect(&module(
            "import type { T } from './t';\ninterface I {}\ntype Both = 1;\nconst Both = 1;\n",
            "a.ts",
        ));
        assert!(bindings.is_type_only("T"));
        assert!(bindings.is_type_only("I"));
        assert!(!bindings.is_type_only("Both"));
    }
}
