use super::erase_types;
use crate::edits::EditSet;
use crate::error::TransformError;
use crate::newline_runs;
use crate::parse::parse_module;
use pretty_assertions::assert_eq;

fn try_erase(source: &str) -> Result<String, TransformError> {
    let parsed = parse_module(source.to_string(), "test.ts")?;
    let mut edits = EditSet::new();
    erase_types(&parsed, "test.ts", &mut edits)?;
    Ok(newline_runs::collapse(&edits.apply(parsed.text())))
}

fn erase(source: &str) -> String {
    try_erase(source).unwrap()
}

#[test]
fn test_annotations_and_optional_params() {
    assert_eq!(
        erase("let a: number = 1;\nfunction f(x: string, y?: number): void {}\n"),
        "let a = 1;\nfunction f(x, y) {}\n"
    );
}

#[test]
fn test_type_declarations_leave_no_lines() {
    let source = "const z = 0;\ninterface A {\n  x: number;\n}\nexport type B = A;\nconst c = 1;\n";
    assert_eq!(erase(source), "const z = 0;\nconst c = 1;\n");
}

#[test]
fn test_doc_comment_goes_with_declaration() {
    assert_eq!(
        erase("const a = 1;\n// about B\ninterface B {}\n"),
        "const a = 1;\n"
    );
}

#[test]
fn test_import_elision() {
    let source = "import { A, b, type C } from './m';\nimport type { D } from './d';\nimport E from './e';\nimport './side-effect';\nconst x: A = b();\n";
    assert_eq!(
        erase(source),
        "import { b } from './m';\nimport './side-effect';\nconst x = b();\n"
    );
}

#[test]
fn test_default_import_kept_named_dropped() {
    assert_eq!(
        erase("import D, { T } from './d';\nlet v: T = D;\n"),
        "import D from './d';\nlet v = D;\n"
    );
}

#[test]
fn test_export_of_local_type_is_dropped() {
    assert_eq!(
        erase("const z = 0;\ntype T = 1;\nconst v = 1;\nexport { T, v };\n"),
        "const z = 0;\nconst v = 1;\nexport { v };\n"
    );
}

#[test]
fn test_expression_wrappers() {
    assert_eq!(
        erase("const v = (foo as any)!.bar satisfies Baz;\nconst w = <number>y;\n"),
        "const v = (foo).bar;\nconst w = y;\n"
    );
}

#[test]
fn test_generic_arguments_and_parameters() {
    assert_eq!(
        erase("const m = new Map<string, number>();\nf<T>(x);\nconst id = <T,>(x: T): T => x;\n"),
        "const m = new Map();\nf(x);\nconst id = (x) => x;\n"
    );
}

#[test]
fn test_this_parameter_and_definite_assignment() {
    assert_eq!(
        erase("let x!: number;\nfunction f(this: Window, a: number) {}\n"),
        "let x;\nfunction f(a) {}\n"
    );
}

#[test]
fn test_enum_lowering() {
    let source = "enum Color {\n  Red,\n  Green = 4,\n  Blue,\n  Name = \"n\",\n}\n";
    assert_eq!(
        erase(source),
        concat!(
            "var Color = function (Color) {\n",
            "  Color[Color[\"Red\"] = 0] = \"Red\";\n",
            "  Color[Color[\"Green\"] = 4] = \"Green\";\n",
            "  Color[Color[\"Blue\"] = 5] = \"Blue\";\n",
            "  Color[\"Name\"] = \"n\";\n",
            "  return Color;\n",
            "}(Color || {});\n",
        )
    );
}

#[test]
fn test_enum_members_referencing_earlier_members() {
    let source = "export const enum Flags {\n  A = 1 << 0,\n  B = 1 << 1,\n  AB = A | B,\n  C = compute(),\n}\n";
    assert_eq!(
        erase(source),
        concat!(
            "export var Flags = function (Flags) {\n",
            "  Flags[Flags[\"A\"] = 1] = \"A\";\n",
            "  Flags[Flags[\"B\"] = 2] = \"B\";\n",
            "  Flags[Flags[\"AB\"] = 3] = \"AB\";\n",
            "  Flags[Flags[\"C\"] = compute()] = \"C\";\n",
            "  return Flags;\n",
            "}(Flags || {});\n",
        )
    );
}

#[test]
fn test_parameter_properties() {
    let source = "class P {\n  constructor(private readonly a: number, public b = 2) {}\n}\n";
    assert_eq!(
        erase(source),
        "class P {\n  constructor(a, b = 2) {\n    this.a = a;\n    this.b = b;\n  }\n}\n"
    );
}

#[test]
fn test_parameter_properties_after_super() {
    let source = "class Q extends P {\n  constructor(protected c: string) {\n    super();\n    run();\n  }\n}\n";
    assert_eq!(
        erase(source),
        "class Q extends P {\n  constructor(c) {\n    super();\n    this.c = c;\n    run();\n  }\n}\n"
    );
}

#[test]
fn test_class_members() {
    let source = concat!(
        "abstract class S<T> extends Base<T> implements I, J {\n",
        "  declare x: number;\n",
        "  y!: string;\n",
        "  z?: number = 1;\n",
        "  private w = 2;\n",
        "  abstract m(): void;\n",
        "  [key: string]: any;\n",
        "  get v(): T { return this.w as T; }\n",
        "}\n",
    );
    assert_eq!(
        erase(source),
        concat!(
            "class S extends Base {\n",
            "  z = 1;\n",
            "  w = 2;\n",
            "  get v() { return this.w; }\n",
            "}\n",
        )
    );
}

#[test]
fn test_declare_forms_and_type_namespaces() {
    let source = concat!(
        "const a = 1;\n",
        "declare const b: number;\n",
        "declare module 'x' {\n  export const y: number;\n}\n",
        "namespace Types {\n  export type T = 1;\n}\n",
        "declare function g(): void;\n",
        "const c = 2;\n",
    );
    assert_eq!(erase(source), "const a = 1;\nconst c = 2;\n");
}

#[test]
fn test_import_equals() {
    assert_eq!(
        erase("import fs = require('fs');\nfs.readFileSync('a');\n"),
        "const fs = require('fs');\nfs.readFileSync('a');\n"
    );
}

#[test]
fn test_value_namespace_is_unsupported() {
    let err = try_erase("namespace N {\n  export const a = 1;\n}\n").unwrap_err();
    assert!(matches!(err, TransformError::Unsupported { .. }));
    assert!(err.to_string().contains("namespace `N`"));
}

#[test]
fn test_export_assignment_is_unsupported() {
    let err = try_erase("const a = 1;\nexport = a;\n").unwrap_err();
    assert!(matches!(err, TransformError::Unsupported { .. }));
}

#[test]
fn test_keyword_ending_previous_line_is_not_a_modifier() {
    assert_eq!(
        erase("let x = declare\ntype T = 1\nfoo(x)\n"),
        "let x = declare\nfoo(x)\n"
    );
    assert_eq!(
        erase("const y = abstract\ninterface I {}\nfoo(y)\n"),
        "const y = abstract\nfoo(y)\n"
    );
}

#[test]
fn test_modifier_named_property_before_next_member() {
    assert_eq!(
        erase("class A {\n  a = this.override\n  b = 1\n}\n"),
        "class A {\n  a = this.override\n  b = 1\n}\n"
    );
    for word in ["declare", "abstract", "override", "readonly", "public", "static"] {
        let source = format!("class A {{\n  a = this.{word}\n  b = 1\n  c: number\n  d = 2\n}}\n");
        assert_eq!(
            erase(&source),
            format!("class A {{\n  a = this.{word}\n  b = 1\n  d = 2\n}}\n"),
            "member after `this.{word}`"
        );
    }
}

#[test]
fn test_modifiers_without_semicolons() {
    let source = concat!(
        "abstract class A {\n",
        "  a = 1\n",
        "  public static b = 2\n",
        "  private readonly c = 3\n",
        "  declare d: string\n",
        "  abstract e(): void\n",
        "  override f() {}\n",
        "}\n",
    );
    assert_eq!(
        erase(source),
        "class A {\n  a = 1\n  static b = 2\n  c = 3\n  f() {}\n}\n"
    );
}

#[test]
fn test_comment_before_type_operator_is_kept() {
    let source = concat!(
        "const a = x /* why */ as T;\n",
        "const b = (y /* sure */!).z;\n",
        "const c = { k: 1 } /* shape */ satisfies S;\n",
    );
    assert_eq!(
        erase(source),
        "const a = x /* why */;\nconst b = (y /* sure */).z;\nconst c = { k: 1 } /* shape */;\n"
    );
}

#[test]
fn test_string_enum_members_concatenate() {
    let source = "enum Route {\n  Root = \"/\",\n  Api = Root + \"api\",\n}\n";
    assert_eq!(
        erase(source),
        concat!(
            "var Route = function (Route) {\n",
            "  Route[\"Root\"] = \"/\";\n",
            "  Route[\"Api\"] = \"/api\";\n",
            "  return Route;\n",
            "}(Route || {});\n",
        )
    );
}
