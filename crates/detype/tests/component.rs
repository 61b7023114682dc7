//! End-to-end behavior of `transform` on Vue components.

use detype::{transform, transform_file, TransformError, TransformOptions};
use pretty_assertions::assert_eq;
use std::fs;

fn vue(code: &str) -> Result<String, TransformError> {
    transform(code, "List.vue", &TransformOptions::default())
}

#[test]
fn untyped_component_is_byte_identical() {
    let code = "<script setup>\nconst a = 1\n\n\n</script>\n<template>\n  <p>{{ a }}</p>\n</template>\n\n";
    assert_eq!(vue(code).unwrap(), code);
}

#[test]
fn setup_component_end_to_end() {
    let code = r#"<script setup lang="ts">
import { computed } from 'vue';
import type { Item } from './types';
import ItemRow from './ItemRow.vue';
interface Props {
  items: Item[];
  title?: string;
}

const props = withDefaults(defineProps<Props>(), { title: 'List' });
const emit = defineEmits<{ select: [item: Item] }>();
const count = computed(() => props.items.length as number);
</script>

<template>
  <h1>{{ props.title }} ({{ count }})</h1>
  <ItemRow v-for="item in props.items" :key="item.id" :item="item" @click="emit('select', item)" />
</template>
"#;
    let expected = r#"<script setup>
import { computed } from 'vue';
import ItemRow from './ItemRow.vue';

const props = defineProps({
  items: { type: Array, required: true },
  title: { type: String, required: false, default: 'List' },
});
const emit = defineEmits(["select"]);
const count = computed(() => props.items.length);
</script>

<template>
  <h1>{{ props.title }} ({{ count }})</h1>
  <ItemRow v-for="item in props.items" :key="item.id" :item="item" @click="emit('select', item)" />
</template>
"#;
    assert_eq!(vue(code).unwrap(), expected);
}

#[test]
fn transform_is_idempotent_on_components() {
    let code = "<script lang=\"ts\">\nexport default { name: 'A' as string };\n</script>\n";
    let once = vue(code).unwrap();
    assert_eq!(once, "<script>\nexport default { name: 'A' };\n</script>\n");
    assert_eq!(vue(&once).unwrap(), once);
}

#[test]
fn unclosed_script_fails() {
    let err = vue("<script lang=\"ts\">\nconst a: number = 1;\n").unwrap_err();
    assert!(matches!(err, TransformError::Sfc { .. }));
}

#[test]
fn macro_types_are_loaded_from_relative_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("props.ts"),
        "export interface Props {\n  count: number;\n  onDone?: () => void;\n}\n",
    )
    .unwrap();
    let input = dir.path().join("Counter.vue");
    fs::write(
        &input,
        "<script setup lang=\"ts\">\nimport type { Props } from './props';\ndefineProps<Props>();\n</script>\n",
    )
    .unwrap();
    let output = dir.path().join("out").join("Counter.vue");

    transform_file(&input, &output, &TransformOptions::default()).unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "<script setup>\ndefineProps({\n  count: { type: Number, required: true },\n  onDone: { type: Function, required: false },\n});\n</script>\n"
    );
}

#[test]
fn missing_macro_type_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Broken.vue");
    fs::write(
        &input,
        "<script setup lang=\"ts\">\nimport type { Props } from './missing';\ndefineProps<Props>();\n</script>\n",
    )
    .unwrap();
    let err = transform_file(&input, &dir.path().join("out.vue"), &TransformOptions::default())
        .unwrap_err();
    assert!(matches!(err, TransformError::UnresolvableType { ref type_name, .. } if type_name == "Props"));
}
