//! Runtime shapes for `defineProps<T>()` and `defineEmits<T>()`.
//!
//! Erasure strips the type argument these macros are declared with, so the
//! runtime declaration is synthesized from the type and spliced back in as
//! the call's argument.

use super::resolve::{Found, TypeDecl, TypeResolver, TypeSourceLoader, MAX_DEPTH};
use crate::engine::remove_types;
use crate::error::TransformError;
use crate::options::TransformOptions;
use crate::parse::parse_module;
use crate::rules::is_callee;
use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use regex::Regex;
use sfc_parser::ScriptBlock;
use std::fmt::Write;
use swc_common::Spanned;
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

static DEFINE_PROPS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"defineProps\s*<").unwrap());
static DEFINE_EMITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"defineEmits\s*<").unwrap());
static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*$").unwrap());

/// Runtime declarations to splice after the macro calls.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct MacroLiterals {
    pub props: Option<String>,
    pub emits: Option<String>,
}

/// Synthesizes the runtime declarations for the typed macros in `setup`.
pub(crate) fn synthesize(
    file_name: &str,
    setup: &ScriptBlock,
    script: Option<&ScriptBlock>,
    loader: &dyn TypeSourceLoader,
) -> Result<MacroLiterals, TransformError> {
    let wants_props = DEFINE_PROPS_RE.is_match(&setup.content);
    let wants_emits = DEFINE_EMITS_RE.is_match(&setup.content);
    if !wants_props && !wants_emits {
        return Ok(MacroLiterals::default());
    }

    let region_name = |block: &ScriptBlock| format!("{}.{}", file_name, block.lang.extension());
    let setup_parsed = parse_module(setup.content.clone(), &region_name(setup))?;
    let mut calls = MacroCalls::default();
    setup_parsed.module().visit_with(&mut calls);

    let mut regions = vec![setup_parsed];
    if let Some(script) = script.filter(|s| s.lang.is_typed()) {
        regions.push(parse_module(script.content.clone(), &region_name(script))?);
    }
    let mut resolver = TypeResolver::new(file_name, loader, regions);

    let mut literals = MacroLiterals::default();
    if wants_props {
        if let Some(props) = &calls.props {
            let members = collect_props(&mut resolver, 0, &props.type_arg, 0)?;
            let defaults = match &props.defaults {
                Some(defaults) => collect_defaults(&resolver, defaults)?,
                None => IndexMap::new(),
            };
            log::debug!("{}: synthesized {} props", file_name, members.len());
            literals.props = Some(render_props(&mut resolver, &members, &defaults)?);
        }
    }
    if wants_emits {
        if let Some(emits) = &calls.emits {
            let mut names = IndexSet::new();
            collect_emits(&mut resolver, 0, emits, 0, &mut names)?;
            log::debug!("{}: synthesized {} emits", file_name, names.len());
            literals.emits = Some(render_emits(&names));
        }
    }
    Ok(literals)
}

struct PropsCall {
    type_arg: TsType,
    defaults: Option<Expr>,
}

#[derive(Default)]
struct MacroCalls {
    props: Option<PropsCall>,
    emits: Option<TsType>,
}

impl MacroCalls {
    fn record_props(&mut self, call: &CallExpr, defaults: Option<Expr>) -> bool {
        if self.props.is_some() || !is_callee(&call.callee, "defineProps") {
            return false;
        }
        let Some(type_arg) = call.type_args.as_ref().and_then(|args| args.params.first()) else {
            return false;
        };
        self.props = Some(PropsCall {
            type_arg: (**type_arg).clone(),
            defaults,
        });
        true
    }
}

impl Visit for MacroCalls {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if is_callee(&call.callee, "withDefaults") {
            if let Some(Expr::Call(inner)) = call.args.first().map(|a| &*a.expr) {
                let defaults = call.args.get(1).map(|a| (*a.expr).clone());
                if self.record_props(inner, defaults) {
                    return;
                }
            }
        }
        if !self.record_props(call, None)
            && self.emits.is_none()
            && is_callee(&call.callee, "defineEmits")
        {
            if let Some(type_arg) = call.type_args.as_ref().and_then(|a| a.params.first()) {
                self.emits = Some((**type_arg).clone());
            }
        }
        call.visit_children_with(self);
    }
}

/// One declared prop.
#[derive(Debug, Clone)]
struct PropMember {
    optional: bool,
    /// The declared type and the module it was written in.
    ty: Option<(usize, TsType)>,
    method: bool,
}

fn type_text(resolver: &TypeResolver<'_>, module: usize, ty: &TsType) -> String {
    resolver.parsed(module).slice(ty.span()).to_string()
}

fn collect_props(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    ty: &TsType,
    depth: usize,
) -> Result<IndexMap<String, PropMember>, TransformError> {
    if depth > MAX_DEPTH {
        return Err(resolver.unresolvable(type_text(resolver, module, ty), "type is too deeply nested"));
    }
    match ty {
        TsType::TsTypeLit(lit) => Ok(members_of(module, &lit.members)),
        TsType::TsParenthesizedType(paren) => collect_props(resolver, module, &paren.type_ann, depth + 1),
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(i)) => {
            let mut members = IndexMap::new();
            for part in &i.types {
                members.extend(collect_props(resolver, module, part, depth + 1)?);
            }
            Ok(members)
        }
        TsType::TsTypeRef(reference) => {
            let TsEntityName::Ident(name) = &reference.type_name else {
                return Err(resolver.unresolvable(
                    type_text(resolver, module, ty),
                    "qualified type names are not supported",
                ));
            };
            let args: Vec<TsType> = reference
                .type_params
                .as_ref()
                .map(|p| p.params.iter().map(|t| (**t).clone()).collect())
                .unwrap_or_default();
            collect_named_props(resolver, module, &name.sym, &args, depth)
        }
        _ => Err(resolver.unresolvable(
            type_text(resolver, module, ty),
            "props must be declared with an object type",
        )),
    }
}

fn collect_named_props(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    name: &str,
    args: &[TsType],
    depth: usize,
) -> Result<IndexMap<String, PropMember>, TransformError> {
    match (name, args) {
        ("Partial" | "Required" | "Readonly", [inner]) => {
            let mut members = collect_props(resolver, module, inner, depth + 1)?;
            for member in members.values_mut() {
                match name {
                    "Partial" => member.optional = true,
                    "Required" => member.optional = false,
                    _ => {}
                }
            }
            Ok(members)
        }
        ("Pick" | "Omit", [inner, keys]) => {
            let members = collect_props(resolver, module, inner, depth + 1)?;
            let mut selected = IndexSet::new();
            literal_strings(resolver, module, keys, depth + 1, &mut selected)?;
            let pick = name == "Pick";
            Ok(members
                .into_iter()
                .filter(|(key, _)| selected.contains(key) == pick)
                .collect())
        }
        _ => {
            let Some(Found { module: found_in, decl }) = resolver.lookup(module, name)? else {
                return Err(resolver.unresolvable(
                    name,
                    "type is not declared in the component or a relative import",
                ));
            };
            match decl {
                TypeDecl::Interface(interface) => {
                    let mut members = IndexMap::new();
                    for parent in &interface.extends {
                        let Expr::Ident(parent_name) = &*parent.expr else {
                            return Err(resolver.unresolvable(name, "unsupported `extends` clause"));
                        };
                        let parent_args: Vec<TsType> = parent
                            .type_args
                            .as_ref()
                            .map(|p| p.params.iter().map(|t| (**t).clone()).collect())
                            .unwrap_or_default();
                        members.extend(collect_named_props(
                            resolver,
                            found_in,
                            &parent_name.sym,
                            &parent_args,
                            depth + 1,
                        )?);
                    }
                    members.extend(members_of(found_in, &interface.body.body));
                    Ok(members)
                }
                TypeDecl::Alias(alias) => collect_props(resolver, found_in, &alias.type_ann, depth + 1),
                TypeDecl::Enum(_) => Err(resolver.unresolvable(name, "an enum cannot declare props")),
            }
        }
    }
}

fn members_of(module: usize, elements: &[TsTypeElement]) -> IndexMap<String, PropMember> {
    let mut members = IndexMap::new();
    for element in elements {
        match element {
            TsTypeElement::TsPropertySignature(prop) => {
                if let Some(key) = key_name(&prop.key) {
                    members.insert(
                        key,
                        PropMember {
                            optional: prop.optional,
                            ty: prop.type_ann.as_ref().map(|a| (module, (*a.type_ann).clone())),
                            method: false,
                        },
                    );
                }
            }
            TsTypeElement::TsMethodSignature(method) => {
                if let Some(key) = key_name(&method.key) {
                    members.insert(
                        key,
                        PropMember {
                            optional: method.optional,
                            ty: None,
                            method: true,
                        },
                    );
                }
            }
            _ => {}
        }
    }
    members
}

fn key_name(key: &Expr) -> Option<String> {
    match key {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().into_owned()),
        Expr::Lit(Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Collects the string literals of a literal type or a union of them.
fn literal_strings(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    ty: &TsType,
    depth: usize,
    out: &mut IndexSet<String>,
) -> Result<(), TransformError> {
    if depth > MAX_DEPTH {
        return Err(resolver.unresolvable(type_text(resolver, module, ty), "type is too deeply nested"));
    }
    match ty {
        TsType::TsLitType(lit) => match &lit.lit {
            TsLit::Str(s) => {
                out.insert(s.value.to_string_lossy().into_owned());
                Ok(())
            }
            _ => Err(resolver.unresolvable(type_text(resolver, module, ty), "expected a string literal type")),
        },
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            for part in &union.types {
                literal_strings(resolver, module, part, depth + 1, out)?;
            }
            Ok(())
        }
        TsType::TsParenthesizedType(paren) => literal_strings(resolver, module, &paren.type_ann, depth + 1, out),
        TsType::TsTypeRef(TsTypeRef {
            type_name: TsEntityName::Ident(name),
            ..
        }) => match resolver.lookup(module, &name.sym)? {
            Some(Found {
                module: found_in,
                decl: TypeDecl::Alias(alias),
            }) => literal_strings(resolver, found_in, &alias.type_ann, depth + 1, out),
            _ => Err(resolver.unresolvable(&*name.sym, "expected a union of string literals")),
        },
        _ => Err(resolver.unresolvable(type_text(resolver, module, ty), "expected a string literal type")),
    }
}

/// Runtime constructors a type can be checked against.
#[derive(Debug, Default)]
struct RuntimeTypes {
    names: IndexSet<&'static str>,
    /// The type admits anything, so no check is emitted.
    any: bool,
}

impl RuntimeTypes {
    fn render(&self) -> String {
        if self.any || self.names.is_empty() {
            return "null".to_string();
        }
        if self.names.len() == 1 {
            return self.names[0].to_string();
        }
        let names: Vec<&str> = self.names.iter().copied().collect();
        format!("[{}]", names.join(", "))
    }
}

fn builtin_constructor(name: &str) -> Option<&'static str> {
    let ctor = match name {
        "String" => "String",
        "Number" => "Number",
        "Boolean" => "Boolean",
        "Symbol" => "Symbol",
        "BigInt" => "BigInt",
        "Array" | "ReadonlyArray" => "Array",
        "Function" | "CallableFunction" => "Function",
        "Object" | "Record" | "Partial" | "Required" | "Readonly" | "Pick" | "Omit" => "Object",
        "Date" => "Date",
        "Promise" => "Promise",
        "Map" | "ReadonlyMap" => "Map",
        "Set" | "ReadonlySet" => "Set",
        "WeakMap" => "WeakMap",
        "WeakSet" => "WeakSet",
        "RegExp" => "RegExp",
        "Error" => "Error",
        _ => return None,
    };
    Some(ctor)
}

fn is_callable_only(elements: &[TsTypeElement]) -> bool {
    !elements.is_empty()
        && elements
            .iter()
            .all(|e| matches!(e, TsTypeElement::TsCallSignatureDecl(_) | TsTypeElement::TsConstructSignatureDecl(_)))
}

fn infer_runtime_types(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    ty: &TsType,
    depth: usize,
    out: &mut RuntimeTypes,
) -> Result<(), TransformError> {
    if depth > MAX_DEPTH {
        out.any = true;
        return Ok(());
    }
    match ty {
        TsType::TsKeywordType(keyword) => match keyword.kind {
            TsKeywordTypeKind::TsStringKeyword => {
                out.names.insert("String");
            }
            TsKeywordTypeKind::TsNumberKeyword => {
                out.names.insert("Number");
            }
            TsKeywordTypeKind::TsBooleanKeyword => {
                out.names.insert("Boolean");
            }
            TsKeywordTypeKind::TsObjectKeyword => {
                out.names.insert("Object");
            }
            TsKeywordTypeKind::TsBigIntKeyword => {
                out.names.insert("BigInt");
            }
            TsKeywordTypeKind::TsSymbolKeyword => {
                out.names.insert("Symbol");
            }
            TsKeywordTypeKind::TsNullKeyword => {
                out.names.insert("null");
            }
            TsKeywordTypeKind::TsUndefinedKeyword
            | TsKeywordTypeKind::TsVoidKeyword
            | TsKeywordTypeKind::TsNeverKeyword => {}
            _ => out.any = true,
        },
        TsType::TsFnOrConstructorType(_) => {
            out.names.insert("Function");
        }
        TsType::TsArrayType(_) | TsType::TsTupleType(_) | TsType::TsRestType(_) => {
            out.names.insert("Array");
        }
        TsType::TsTypeLit(lit) => {
            out.names
                .insert(if is_callable_only(&lit.members) { "Function" } else { "Object" });
        }
        TsType::TsMappedType(_) => {
            out.names.insert("Object");
        }
        TsType::TsLitType(lit) => {
            let name = match lit.lit {
                TsLit::Str(_) | TsLit::Tpl(_) => "String",
                TsLit::Number(_) => "Number",
                TsLit::Bool(_) => "Boolean",
                TsLit::BigInt(_) => "BigInt",
            };
            out.names.insert(name);
        }
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            for part in &union.types {
                infer_runtime_types(resolver, module, part, depth + 1, out)?;
            }
        }
        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(i)) => {
            for part in &i.types {
                infer_runtime_types(resolver, module, part, depth + 1, out)?;
            }
        }
        TsType::TsParenthesizedType(paren) => {
            infer_runtime_types(resolver, module, &paren.type_ann, depth + 1, out)?
        }
        TsType::TsOptionalType(optional) => {
            infer_runtime_types(resolver, module, &optional.type_ann, depth + 1, out)?
        }
        TsType::TsTypeOperator(op) => match op.op {
            TsTypeOperatorOp::ReadOnly => {
                infer_runtime_types(resolver, module, &op.type_ann, depth + 1, out)?
            }
            TsTypeOperatorOp::KeyOf => {
                out.names.extend(["String", "Number", "Symbol"]);
            }
            TsTypeOperatorOp::Unique => {
                out.names.insert("Symbol");
            }
        },
        TsType::TsTypeRef(reference) => {
            let TsEntityName::Ident(name) = &reference.type_name else {
                out.any = true;
                return Ok(());
            };
            if let Some(ctor) = builtin_constructor(&name.sym) {
                out.names.insert(ctor);
                return Ok(());
            }
            if &*name.sym == "NonNullable" {
                if let Some(inner) = reference.type_params.as_ref().and_then(|p| p.params.first()) {
                    let mut inner_types = RuntimeTypes::default();
                    infer_runtime_types(resolver, module, inner, depth + 1, &mut inner_types)?;
                    inner_types.names.shift_remove("null");
                    out.names.extend(inner_types.names);
                    out.any |= inner_types.any;
                }
                return Ok(());
            }
            match resolver.lookup(module, &name.sym)? {
                Some(Found {
                    decl: TypeDecl::Interface(interface),
                    ..
                }) => {
                    out.names.insert(if is_callable_only(&interface.body.body) {
                        "Function"
                    } else {
                        "Object"
                    });
                }
                Some(Found {
                    module: found_in,
                    decl: TypeDecl::Alias(alias),
                }) => infer_runtime_types(resolver, found_in, &alias.type_ann, depth + 1, out)?,
                Some(Found {
                    decl: TypeDecl::Enum(e),
                    ..
                }) => {
                    for member in &e.members {
                        let is_string = matches!(
                            member.init.as_deref(),
                            Some(Expr::Lit(Lit::Str(_))) | Some(Expr::Tpl(_))
                        );
                        out.names.insert(if is_string { "String" } else { "Number" });
                    }
                }
                // Type parameters and globals the resolver cannot see.
                None => out.any = true,
            }
        }
        _ => out.any = true,
    }
    Ok(())
}

/// Default values from the `withDefaults` object, as `default` entries.
fn collect_defaults(
    resolver: &TypeResolver<'_>,
    defaults: &Expr,
) -> Result<IndexMap<String, String>, TransformError> {
    let mut entries = IndexMap::new();
    let Expr::Object(object) = defaults else {
        log::warn!(
            "{}: withDefaults defaults are not an object literal and were dropped",
            resolver.file_name()
        );
        return Ok(entries);
    };
    let parsed = resolver.parsed(0);
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            log::warn!("{}: spread in withDefaults defaults was dropped", resolver.file_name());
            continue;
        };
        match &**prop {
            Prop::KeyValue(kv) => {
                if let Some(key) = prop_key(&kv.key) {
                    let value = erase_snippet(resolver.file_name(), "(", parsed.slice(kv.value.span()), ")")?;
                    entries.insert(key, format!("default: {}", value));
                }
            }
            Prop::Shorthand(ident) => {
                entries.insert(ident.sym.to_string(), format!("default: {}", ident.sym));
            }
            Prop::Method(method) => {
                if let Some(key) = prop_key(&method.key) {
                    let key_end = parsed.hi(method.key.span());
                    let end = parsed.hi(prop.span());
                    let rest = &parsed.text()[key_end..end];
                    let erased = erase_snippet(resolver.file_name(), "({ default", rest, " })")?;
                    entries.insert(key, format!("default{}", erased));
                }
            }
            _ => log::warn!(
                "{}: unsupported entry in withDefaults defaults was dropped",
                resolver.file_name()
            ),
        }
    }
    Ok(entries)
}

fn prop_key(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().into_owned()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Erases types from a fragment by wrapping it into a parsable statement.
fn erase_snippet(
    file_name: &str,
    prefix: &str,
    text: &str,
    suffix: &str,
) -> Result<String, TransformError> {
    let wrapped = format!("{prefix}{text}{suffix}");
    let erased = remove_types(&wrapped, &format!("{file_name}.ts"), &TransformOptions::default())?;
    Ok(erased
        .strip_prefix(prefix)
        .and_then(|s| s.strip_suffix(suffix))
        .map_or_else(|| text.to_string(), str::to_string))
}

fn render_key(key: &str) -> String {
    if IDENT_RE.is_match(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

fn quote(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn render_props(
    resolver: &mut TypeResolver<'_>,
    members: &IndexMap<String, PropMember>,
    defaults: &IndexMap<String, String>,
) -> Result<String, TransformError> {
    let mut out = String::from("{\n");
    for (name, member) in members {
        let ty = if member.method {
            "Function".to_string()
        } else if let Some((module, ty)) = &member.ty {
            let mut types = RuntimeTypes::default();
            infer_runtime_types(resolver, *module, ty, 0, &mut types)?;
            types.render()
        } else {
            "null".to_string()
        };
        let _ = write!(
            out,
            "  {}: {{ type: {}, required: {}",
            render_key(name),
            ty,
            !member.optional
        );
        if let Some(default) = defaults.get(name) {
            let _ = write!(out, ", {}", default);
        }
        out.push_str(" },\n");
    }
    out.push('}');
    Ok(out)
}

fn collect_emits(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    ty: &TsType,
    depth: usize,
    out: &mut IndexSet<String>,
) -> Result<(), TransformError> {
    if depth > MAX_DEPTH {
        return Err(resolver.unresolvable(type_text(resolver, module, ty), "type is too deeply nested"));
    }
    match ty {
        TsType::TsTypeLit(lit) => emits_of(resolver, module, &lit.members, depth, out),
        TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(f)) => {
            event_param(resolver, module, f.params.first(), depth, out)
        }
        TsType::TsParenthesizedType(paren) => collect_emits(resolver, module, &paren.type_ann, depth + 1, out),
        TsType::TsUnionOrIntersectionType(types) => {
            let parts = match types {
                TsUnionOrIntersectionType::TsUnionType(u) => &u.types,
                TsUnionOrIntersectionType::TsIntersectionType(i) => &i.types,
            };
            for part in parts {
                collect_emits(resolver, module, part, depth + 1, out)?;
            }
            Ok(())
        }
        TsType::TsTypeRef(TsTypeRef {
            type_name: TsEntityName::Ident(name),
            ..
        }) => match resolver.lookup(module, &name.sym)? {
            Some(Found {
                module: found_in,
                decl: TypeDecl::Interface(interface),
            }) => emits_of(resolver, found_in, &interface.body.body, depth, out),
            Some(Found {
                module: found_in,
                decl: TypeDecl::Alias(alias),
            }) => collect_emits(resolver, found_in, &alias.type_ann, depth + 1, out),
            _ => Err(resolver.unresolvable(&*name.sym, "emits must be declared with a function or object type")),
        },
        _ => Err(resolver.unresolvable(
            type_text(resolver, module, ty),
            "emits must be declared with a function or object type",
        )),
    }
}

fn emits_of(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    elements: &[TsTypeElement],
    depth: usize,
    out: &mut IndexSet<String>,
) -> Result<(), TransformError> {
    for element in elements {
        match element {
            TsTypeElement::TsCallSignatureDecl(call) => {
                event_param(resolver, module, call.params.first(), depth, out)?
            }
            // `{ change: [id: number] }`
            TsTypeElement::TsPropertySignature(prop) => {
                if let Some(key) = key_name(&prop.key) {
                    out.insert(key);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn event_param(
    resolver: &mut TypeResolver<'_>,
    module: usize,
    param: Option<&TsFnParam>,
    depth: usize,
    out: &mut IndexSet<String>,
) -> Result<(), TransformError> {
    let ann = match param {
        Some(TsFnParam::Ident(binding)) => binding.type_ann.as_ref(),
        _ => None,
    };
    match ann {
        Some(ann) => literal_strings(resolver, module, &ann.type_ann, depth + 1, out),
        None => Err(resolver.unresolvable("emits", "the event name parameter needs a literal type")),
    }
}

fn render_emits(names: &IndexSet<String>) -> String {
    let quoted: Vec<String> = names.iter().map(|n| quote(n)).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sfc::resolve::FsLoader;
    use pretty_assertions::assert_eq;

    fn literals(source: &str) -> MacroLiterals {
        let result = sfc_parser::parse(source);
        let setup = result.descriptor.script_setup.as_ref().unwrap();
        synthesize("Comp.vue", setup, result.descriptor.script.as_ref(), &FsLoader).unwrap()
    }

    #[test]
    fn test_props_from_type_literal() {
        let out = literals(
            "<script setup lang=\"ts\">\nconst props = defineProps<{ msg: string; count?: number | null; items: string[]; onPick(id: number): void }>();\n</script>\n",
        );
        assert_eq!(
            out.props.as_deref(),
            Some(concat!(
                "{\n",
                "  msg: { type: String, required: true },\n",
                "  count: { type: [Number, null], required: false },\n",
                "  items: { type: Array, required: true },\n",
                "  onPick: { type: Function, required: true },\n",
                "}",
            ))
        );
        assert_eq!(out.emits, None);
    }

    #[test]
    fn test_props_from_interface_in_other_region_with_defaults() {
        let source = concat!(
            "<script lang=\"ts\">\nexport interface Base { id: string }\n</script>\n",
            "<script setup lang=\"ts\">\n",
            "interface Props extends Base { size?: 'sm' | 'lg'; tags?: string[] }\n",
            "const props = withDefaults(defineProps<Props>(), { size: 'sm', tags: () => [] as string[] });\n",
            "</script>\n",
        );
        assert_eq!(
            literals(source).props.as_deref(),
            Some(concat!(
                "{\n",
                "  id: { type: String, required: true },\n",
                "  size: { type: String, required: false, default: 'sm' },\n",
                "  tags: { type: Array, required: false, default: () => [] },\n",
                "}",
            ))
        );
    }

    #[test]
    fn test_emits_from_call_signatures_and_tuples() {
        let out = literals(concat!(
            "<script setup lang=\"ts\">\n",
            "const emit = defineEmits<{ (e: 'change', id: number): void; (e: 'open' | 'close'): void }>();\n",
            "</script>\n",
        ));
        assert_eq!(out.emits.as_deref(), Some(r#"["change", "open", "close"]"#));

        let out = literals(concat!(
            "<script setup lang=\"ts\">\n",
            "const emit = defineEmits<{ change: [id: number]; 'update:value': [v: string] }>();\n",
            "</script>\n",
        ));
        assert_eq!(out.emits.as_deref(), Some(r#"["change", "update:value"]"#));
    }

    #[test]
    fn test_no_macros_no_literals() {
        let out = literals("<script setup lang=\"ts\">\nconst a: number = 1;\n</script>\n");
        assert_eq!(out, MacroLiterals::default());
    }

    #[test]
    fn test_unresolvable_props_type() {
        let result = sfc_parser::parse(
            "<script setup lang=\"ts\">\nimport type { P } from 'pkg';\ndefineProps<P>();\n</script>\n",
        );
        let setup = result.descriptor.script_setup.as_ref().unwrap();
        let err = synthesize("Comp.vue", setup, None, &FsLoader).unwrap_err();
        assert!(matches!(err, TransformError::UnresolvableType { .. }));
    }
}
