//! Block splitting tests over realistic component documents.

use pretty_assertions::assert_eq;
use sfc_parser::{parse, Attribute, DirectiveArg, ElementKind, ScriptLang, TemplateNode};

const COMPONENT: &str = r#"<script lang="ts">
export default { name: 'Counter' }
</script>

<script setup lang="ts">
import { ref } from 'vue'
const count = ref<number>(0)
</script>

<template>
  <div class="counter">
    <!-- display -->
    <span>{{ count }}</span>
    <base-button @click="count++" :label="`+${step}`">add</base-button>
  </div>
</template>

<style scoped>
.counter > span { color: red; }
</style>

<i18n lang="json">
{ "en": { "add": "Add" } }
</i18n>
"#;

#[test]
fn splits_every_block() {
    let result = parse(COMPONENT);
    assert!(result.errors.is_empty(), "{:?}", result.errors);

    let descriptor = result.descriptor;
    let script = descriptor.script.as_ref().expect("script");
    let setup = descriptor.script_setup.as_ref().expect("script setup");

    assert_eq!(script.lang, ScriptLang::TypeScript);
    assert_eq!(script.content, "\nexport default { name: 'Counter' }\n");
    assert_eq!(
        setup.content,
        "\nimport { ref } from 'vue'\nconst count = ref<number>(0)\n"
    );
    assert_eq!(&COMPONENT[setup.content_span.range()], setup.content);

    assert_eq!(descriptor.styles.len(), 1);
    assert_eq!(descriptor.styles[0].content, "\n.counter > span { color: red; }\n");
    assert_eq!(descriptor.custom_blocks.len(), 1);
    assert_eq!(descriptor.custom_blocks[0].tag, "i18n");
}

#[test]
fn template_tree_keeps_directives() {
    let result = parse(COMPONENT);
    let template = result.descriptor.template.expect("template");
    let fragment = template.ast.expect("ast");

    let div = fragment
        .nodes
        .iter()
        .find_map(|n| match n {
            TemplateNode::Element(e) => Some(e),
            _ => None,
        })
        .expect("root element");
    assert_eq!(div.tag, "div");

    let button = div
        .children
        .iter()
        .find_map(|n| match n {
            TemplateNode::Element(e) if e.tag == "base-button" => Some(e),
            _ => None,
        })
        .expect("component");
    assert_eq!(button.kind, ElementKind::Component);

    let names: Vec<String> = button
        .attributes
        .iter()
        .filter_map(|a| match a {
            Attribute::Directive(d) => Some(match &d.arg {
                Some(DirectiveArg::Static(arg)) => format!("{}:{}", d.name, arg),
                _ => d.name.to_string(),
            }),
            Attribute::Static(_) => None,
        })
        .collect();
    assert_eq!(names, vec!["on:click", "bind:label"]);
}

#[test]
fn unclosed_script_reports_fatal_error() {
    let result = parse("<template><p>hi</p></template>\n<script setup lang=\"ts\">\nconst a = 1\n");
    let fatal = result.fatal_error().expect("fatal error");
    assert_eq!(fatal.to_string(), "unclosed block: <script>");
}
