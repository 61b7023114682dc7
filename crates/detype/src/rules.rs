//! Additional erasure rules.
//!
//! Rules run after the built-in erasure over the same parsed module and add
//! their own edits. They are the extension point for rewrites the built-in
//! erasure does not know about.

use crate::edits::EditSet;
use crate::error::TransformError;
use crate::parse::ParsedSource;
use std::ops::Range;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// A rewrite applied to a parsed module.
pub trait ErasureRule: Send + Sync {
    /// A short name used in logs.
    fn name(&self) -> &str;

    /// Records the rule's edits into `cx`.
    fn apply(&self, cx: &mut RuleContext<'_>) -> Result<(), TransformError>;
}

/// What a rule sees of the module being erased.
pub struct RuleContext<'a> {
    parsed: &'a ParsedSource,
    file_name: &'a str,
    edits: &'a mut EditSet,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(parsed: &'a ParsedSource, file_name: &'a str, edits: &'a mut EditSet) -> Self {
        Self {
            parsed,
            file_name,
            edits,
        }
    }

    /// The parsed module.
    pub fn module(&self) -> &'a Module {
        self.parsed.module()
    }

    /// The text the module was parsed from.
    pub fn text(&self) -> &'a str {
        self.parsed.text()
    }

    /// The file name the module was parsed as.
    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    /// Byte range of `span` in [`Self::text`].
    pub fn range(&self, span: Span) -> Range<usize> {
        self.parsed.range(span)
    }

    /// Removes a byte range.
    pub fn remove(&mut self, range: Range<usize>) {
        self.edits.remove(range);
    }

    /// Replaces a byte range with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl Into<String>) {
        self.edits.replace(range, text);
    }

    /// Inserts `text` at a byte offset.
    pub fn insert(&mut self, offset: usize, text: impl Into<String>) {
        self.edits.insert(offset, text);
    }
}

/// Rewrites `withDefaults(defineProps<T>(), defaults)` to `defineProps<T>()`.
///
/// The defaults are carried into the synthesized props literal instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct WithDefaultsRule;

impl ErasureRule for WithDefaultsRule {
    fn name(&self) -> &str {
        "remove-with-defaults"
    }

    fn apply(&self, cx: &mut RuleContext<'_>) -> Result<(), TransformError> {
        let mut finder = WithDefaultsFinder::default();
        cx.module().visit_with(&mut finder);
        for (outer, inner) in finder.calls {
            let outer = cx.range(outer);
            let inner = cx.range(inner);
            cx.remove(outer.start..inner.start);
            cx.remove(inner.end..outer.end);
        }
        Ok(())
    }
}

#[derive(Default)]
struct WithDefaultsFinder {
    calls: Vec<(Span, Span)>,
}

impl Visit for WithDefaultsFinder {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if is_callee(&call.callee, "withDefaults") {
            if let Some(arg) = call.args.first() {
                if let Expr::Call(inner) = &*arg.expr {
                    if is_callee(&inner.callee, "defineProps") && arg.spread.is_none() {
                        self.calls.push((call.span, inner.span()));
                        return;
                    }
                }
            }
        }
        call.visit_children_with(self);
    }
}

/// Whether `callee` is the bare identifier `name`.
pub(crate) fn is_callee(callee: &Callee, name: &str) -> bool {
    matches!(callee, Callee::Expr(expr) if matches!(&**expr, Expr::Ident(id) if &*id.sym == name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_module;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_with_defaults_unwraps_define_props() {
        let source = "const props = withDefaults(defineProps<Props>(), { size: 1 });\n";
        let parsed = parse_module(source.to_string(), "a.vue.ts").unwrap();
        let mut edits = EditSet::new();
        let mut cx = RuleContext::new(&parsed, "a.vue.ts", &mut edits);
        WithDefaultsRule.apply(&mut cx).unwrap();
        assert_eq!(
            edits.apply(parsed.text()),
            "const props = defineProps<Props>();\n"
        );
    }

    #[test]
    fn test_other_calls_untouched() {
        let source = "const a = withDefaults(other(), {});\n";
        let parsed = parse_module(source.to_string(), "a.ts").unwrap();
        let mut edits = EditSet::new();
        let mut cx = RuleContext::new(&parsed, "a.ts", &mut edits);
        WithDefaultsRule.apply(&mut cx).unwrap();
        assert!(edits.is_empty());
    }
}
