//! Import and export elision.

use super::Eraser;
use std::ops::Range;
use swc_ecma_ast::*;

impl Eraser<'_> {
    pub(super) fn erase_import(&mut self, import: &ImportDecl) {
        if import.type_only {
            self.remove_type_only(import.span);
            return;
        }
        if import.specifiers.is_empty() {
            return;
        }

        let kept: Vec<bool> = import
            .specifiers
            .iter()
            .map(|specifier| match specifier {
                ImportSpecifier::Named(named) => {
                    !named.is_type_only && self.references.contains(&named.local.sym)
                }
                ImportSpecifier::Default(default) => self.references.contains(&default.local.sym),
                ImportSpecifier::Namespace(ns) => self.references.contains(&ns.local.sym),
            })
            .collect();
        if kept.iter().all(|k| !k) {
            self.remove_construct(import.span);
            return;
        }
        if kept.iter().all(|k| *k) {
            return;
        }

        let mut named = Vec::new();
        for (specifier, keep) in import.specifiers.iter().zip(&kept) {
            match specifier {
                ImportSpecifier::Default(default) if !keep => {
                    // `D, { a }` or `D, * as ns`: drop through the comma.
                    let start = self.lo(default.span);
                    let end = self.hi(default.span);
                    let rest = &self.text()[end..];
                    let next = rest
                        .find(',')
                        .map(|i| self.skip_ws_forward(end + i + 1))
                        .unwrap_or(end);
                    self.remove(start..next);
                }
                ImportSpecifier::Named(spec) => {
                    let range = self.specifier_range(spec.span, spec.is_type_only);
                    named.push((range, !keep));
                }
                _ => {}
            }
        }

        if !named.is_empty() && named.iter().all(|(_, removed)| *removed) {
            // Default kept, whole brace list goes.
            let Some(ImportSpecifier::Default(default)) = import.specifiers.first() else {
                return;
            };
            let from = self.hi(default.span);
            let last = named.last().map_or(from, |(r, _)| r.end);
            let close = self.text()[last..].find('}').map_or(last, |i| last + i + 1);
            self.remove(from..close);
            return;
        }
        self.remove_list_items(&named);
    }

    pub(super) fn erase_named_export(&mut self, export: &NamedExport) {
        if export.type_only {
            self.remove_type_only(export.span);
            return;
        }
        let items: Vec<(Range<usize>, bool)> = export
            .specifiers
            .iter()
            .map(|specifier| match specifier {
                ExportSpecifier::Named(named) => {
                    let local_type = export.src.is_none()
                        && matches!(&named.orig, ModuleExportName::Ident(id) if self.bindings.is_type_only(&id.sym));
                    (
                        self.specifier_range(named.span, named.is_type_only),
                        named.is_type_only || local_type,
                    )
                }
                ExportSpecifier::Default(d) => (self.parsed.range(d.exported.span), false),
                ExportSpecifier::Namespace(ns) => (self.parsed.range(ns.span), false),
            })
            .collect();

        if items.is_empty() || items.iter().all(|(_, removed)| !removed) {
            return;
        }
        if items.iter().all(|(_, removed)| *removed) {
            self.remove_type_only(export.span);
            return;
        }
        self.remove_list_items(&items);
    }

    pub(super) fn erase_import_equals(&mut self, decl: &TsImportEqualsDecl) {
        if decl.is_type_only {
            self.remove_type_only(decl.span);
            return;
        }
        if !decl.is_export && !self.references.contains(&decl.id.sym) {
            self.remove_construct(decl.span);
            return;
        }
        let start = self.lo(decl.span);
        let id = self.lo(decl.id.span);
        let Some(import_kw) = self.text()[start..id].find("import").map(|i| start + i) else {
            return;
        };
        let keyword = match decl.module_ref {
            TsModuleRef::TsExternalModuleRef(_) => "const ",
            TsModuleRef::TsEntityName(_) => "var ",
        };
        self.edits.replace(import_kw..id, keyword);
    }

    /// A specifier's range, widened over a leading inline `type` keyword.
    fn specifier_range(&self, span: swc_common::Span, type_only: bool) -> Range<usize> {
        let range = self.parsed.range(span);
        if type_only {
            if let Some(word) = self.word_before(range.start) {
                if &self.text()[word.clone()] == "type" {
                    return word.start..range.end;
                }
            }
        }
        range
    }

    /// Removes the flagged entries of a comma separated list, keeping the
    /// separators of what remains.
    fn remove_list_items(&mut self, items: &[(Range<usize>, bool)]) {
        for (i, (range, removed)) in items.iter().enumerate() {
            if !removed {
                continue;
            }
            let kept_after = items[i + 1..].iter().any(|(_, r)| !r);
            if kept_after {
                let next = items[i + 1].0.start;
                self.remove(range.start..next);
            } else if let Some((kept, _)) = items[..i].iter().rev().find(|(_, r)| !r) {
                self.remove(kept.end..range.end);
            }
        }
    }
}
