//! Lowering of `enum` declarations to their runtime object.

use super::Eraser;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

#[derive(Debug, Clone)]
enum MemberValue {
    Number(f64),
    String(String),
    /// Source text evaluated at runtime.
    Computed(String),
}

impl Eraser<'_> {
    /// Replaces `[const] enum E { ... }` with an immediately invoked
    /// function filling `E`.
    pub(super) fn lower_enum(&mut self, decl: &TsEnumDecl) {
        let id_lo = self.lo(decl.id.span);
        let mut start = self.lo(decl.span).min(id_lo);
        if let Some(word) = self.word_before(id_lo) {
            if &self.text()[word.clone()] == "enum" {
                start = start.min(word.start);
            }
        }
        if let Some(word) = self.word_before(start) {
            if &self.text()[word.clone()] == "const" {
                start = word.start;
            }
        }

        let name = decl.id.sym.to_string();
        let indent = self.line_indent(start);
        let mut known: FxHashMap<SmolStr, MemberValue> = FxHashMap::default();
        let mut previous: Option<(String, MemberValue)> = None;
        let mut out = format!("var {name} = function ({name}) {{\n");

        for member in &decl.members {
            let key = match &member.id {
                TsEnumMemberId::Ident(id) => id.sym.to_string(),
                TsEnumMemberId::Str(s) => s.value.to_string_lossy().into_owned(),
            };
            let quoted = quote(&key);
            let value = match &member.init {
                Some(init) => match fold(init, &name, &known) {
                    Some(value) => value,
                    None => MemberValue::Computed(self.rewrite_member_refs(init, &name, &known)),
                },
                None => match &previous {
                    None => MemberValue::Number(0.0),
                    Some((_, MemberValue::Number(n))) => MemberValue::Number(n + 1.0),
                    Some((prev, _)) => MemberValue::Computed(format!("{name}[{}] + 1", quote(prev))),
                },
            };

            match &value {
                MemberValue::String(s) => {
                    out.push_str(&format!("{indent}  {name}[{quoted}] = {};\n", quote(s)));
                }
                MemberValue::Number(n) => {
                    out.push_str(&format!(
                        "{indent}  {name}[{name}[{quoted}] = {}] = {quoted};\n",
                        format_number(*n)
                    ));
                }
                MemberValue::Computed(src) => {
                    out.push_str(&format!(
                        "{indent}  {name}[{name}[{quoted}] = {src}] = {quoted};\n"
                    ));
                }
            }
            known.insert(SmolStr::new(&key), value.clone());
            previous = Some((key, value));
        }

        out.push_str(&format!("{indent}  return {name};\n{indent}}}({name} || {{}});"));
        let end = self.hi(decl.span);
        self.edits.replace(start..end, out);
    }

    /// Source of `init` with bare references to earlier members qualified
    /// by the enum name.
    fn rewrite_member_refs(
        &self,
        init: &Expr,
        name: &str,
        known: &FxHashMap<SmolStr, MemberValue>,
    ) -> String {
        let mut finder = MemberRefFinder {
            known,
            spans: Vec::new(),
        };
        init.visit_with(&mut finder);
        finder.spans.sort_by_key(|s| s.lo);

        let range = self.parsed.range(init.span());
        let mut out = String::new();
        let mut cursor = range.start;
        for span in finder.spans {
            let lo = self.lo(span);
            out.push_str(&self.text()[cursor..lo]);
            out.push_str(name);
            out.push('.');
            cursor = lo;
        }
        out.push_str(&self.text()[cursor..range.end]);
        out
    }
}

struct MemberRefFinder<'k> {
    known: &'k FxHashMap<SmolStr, MemberValue>,
    spans: Vec<Span>,
}

impl Visit for MemberRefFinder<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) if self.known.contains_key(&*ident.sym) => {
                self.spans.push(ident.span);
            }
            _ => expr.visit_children_with(self),
        }
    }

    // Nested functions may shadow member names.
    fn visit_function(&mut self, _: &Function) {}
    fn visit_arrow_expr(&mut self, _: &ArrowExpr) {}
}

/// Evaluates a member initializer that is a compile-time constant.
fn fold(expr: &Expr, enum_name: &str, known: &FxHashMap<SmolStr, MemberValue>) -> Option<MemberValue> {
    match expr {
        Expr::Lit(Lit::Num(n)) => Some(MemberValue::Number(n.value)),
        Expr::Lit(Lit::Str(s)) => Some(MemberValue::String(s.value.to_string_lossy().into_owned())),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let cooked = tpl.quasis.first()?.cooked.as_ref()?;
            Some(MemberValue::String(cooked.to_string_lossy().into_owned()))
        }
        Expr::Paren(paren) => fold(&paren.expr, enum_name, known),
        Expr::Ident(ident) => constant(known.get(&*ident.sym)?),
        Expr::Member(member) => {
            let Expr::Ident(obj) = &*member.obj else {
                return None;
            };
            if &*obj.sym != enum_name {
                return None;
            }
            let key = match &member.prop {
                MemberProp::Ident(prop) => SmolStr::new(&prop.sym),
                MemberProp::Computed(computed) => match &*computed.expr {
                    Expr::Lit(Lit::Str(s)) => SmolStr::new(s.value.to_string_lossy()),
                    _ => return None,
                },
                MemberProp::PrivateName(_) => return None,
            };
            constant(known.get(&key)?)
        }
        Expr::Unary(unary) => {
            let MemberValue::Number(n) = fold(&unary.arg, enum_name, known)? else {
                return None;
            };
            let value = match unary.op {
                UnaryOp::Minus => -n,
                UnaryOp::Plus => n,
                UnaryOp::Tilde => !to_int32(n) as f64,
                _ => return None,
            };
            Some(MemberValue::Number(value))
        }
        Expr::Bin(bin) => {
            let left = fold(&bin.left, enum_name, known)?;
            let right = fold(&bin.right, enum_name, known)?;
            match (left, right) {
                (MemberValue::Number(l), MemberValue::Number(r)) => {
                    binary_number(bin.op, l, r).map(MemberValue::Number)
                }
                (MemberValue::String(l), MemberValue::String(r)) if bin.op == BinaryOp::Add => {
                    Some(MemberValue::String(format!("{l}{r}")))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

fn constant(value: &MemberValue) -> Option<MemberValue> {
    match value {
        MemberValue::Computed(_) => None,
        other => Some(other.clone()),
    }
}

fn binary_number(op: BinaryOp, l: f64, r: f64) -> Option<f64> {
    let value = match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Mod => l % r,
        BinaryOp::Exp => l.powf(r),
        BinaryOp::BitOr => (to_int32(l) | to_int32(r)) as f64,
        BinaryOp::BitAnd => (to_int32(l) & to_int32(r)) as f64,
        BinaryOp::BitXor => (to_int32(l) ^ to_int32(r)) as f64,
        BinaryOp::LShift => to_int32(l).wrapping_shl(to_int32(r) as u32 & 31) as f64,
        BinaryOp::RShift => to_int32(l).wrapping_shr(to_int32(r) as u32 & 31) as f64,
        BinaryOp::ZeroFillRShift => {
            (to_int32(l) as u32).wrapping_shr(to_int32(r) as u32 & 31) as f64
        }
        _ => return None,
    };
    Some(value)
}

fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    (n.trunc() as i64) as i32
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-1.0), "-1");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_bitwise_folding() {
        assert_eq!(binary_number(BinaryOp::LShift, 1.0, 3.0), Some(8.0));
        assert_eq!(binary_number(BinaryOp::BitOr, 1.0, 2.0), Some(3.0));
        assert_eq!(binary_number(BinaryOp::ZeroFillRShift, -1.0, 28.0), Some(15.0));
    }
}
