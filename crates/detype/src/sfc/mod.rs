//! Vue single-file components.
//!
//! Each typed script region is erased on its own and spliced back into the
//! untouched document. Template-only reads of setup bindings are protected
//! from import elision, and typed `defineProps`/`defineEmits` calls get their
//! runtime declarations back.

mod macros;
pub mod resolve;
mod usage;

use crate::engine::remove_types;
use crate::error::TransformError;
use crate::options::TransformOptions;
use crate::rules::WithDefaultsRule;
use sfc_parser::{ScriptBlock, ScriptLang};
use std::cmp::Reverse;
use std::sync::Arc;

/// Whether `file_name` names a component document.
pub fn is_component_file(file_name: &str) -> bool {
    file_name.ends_with(".vue")
}

/// Erases the typed script regions of a component document.
///
/// Returns `Ok(None)` when no region is typed; the document is then left
/// exactly as it is.
pub fn transform_component(
    code: &str,
    file_name: &str,
    options: &TransformOptions,
) -> Result<Option<String>, TransformError> {
    let code = code.replace("\r\n", "\n");
    let result = sfc_parser::parse(&code);
    if let Some(err) = result.fatal_error() {
        return Err(TransformError::Sfc {
            file_name: file_name.to_string(),
            source: err.clone(),
        });
    }
    for err in &result.errors {
        log::warn!("{}: {}", file_name, err);
    }
    let descriptor = result.descriptor;

    let typed: Vec<&ScriptBlock> = descriptor
        .scripts()
        .into_iter()
        .filter(|s| s.lang.is_typed())
        .collect();
    if typed.is_empty() {
        log::debug!("{}: no typed script, leaving as is", file_name);
        return Ok(None);
    }

    let literals = match &descriptor.script_setup {
        Some(setup) if setup.lang.is_typed() => macros::synthesize(
            file_name,
            setup,
            descriptor.script.as_ref(),
            options.type_loader.as_ref(),
        )?,
        _ => macros::MacroLiterals::default(),
    };

    let mut region_options = options.clone();
    region_options.rules.insert(0, Arc::new(WithDefaultsRule));

    let references = descriptor
        .template
        .as_ref()
        .and_then(|t| t.ast.as_ref())
        .map(usage::template_references);

    let mut erased_regions = Vec::with_capacity(typed.len());
    for script in typed {
        let mut content = script.content.clone();
        let mut added_newline = false;
        let suffix = match (&references, script.setup) {
            (Some(names), true) => usage::usage_suffix(names),
            _ => None,
        };
        if let Some(suffix) = suffix {
            if !content.ends_with('\n') {
                content.push('\n');
                added_newline = true;
            }
            content.push_str(&suffix);
        }

        let region_name = format!("{}.{}", file_name, script.lang.extension());
        let mut erased = remove_types(&content, &region_name, &region_options)?;
        if let Some(index) = erased.find(usage::USAGE_SENTINEL) {
            erased.truncate(index);
            if added_newline && erased.ends_with('\n') {
                erased.pop();
            }
        }

        if script.setup {
            if let Some(props) = &literals.props {
                splice_after(&mut erased, "defineProps(", props);
            }
            if let Some(emits) = &literals.emits {
                splice_after(&mut erased, "defineEmits(", emits);
            }
        }
        erased_regions.push((script, erased));
    }

    // Later regions first so earlier offsets stay valid.
    erased_regions.sort_by_key(|(script, _)| Reverse(script.content_span.start));
    let mut out = code.clone();
    for (script, erased) in erased_regions {
        out.replace_range(script.content_span.range(), &erased);
        strip_lang(&mut out, script);
    }
    Ok(Some(out))
}

fn splice_after(text: &mut String, needle: &str, literal: &str) {
    if let Some(index) = text.find(needle) {
        text.insert_str(index + needle.len(), literal);
    }
}

/// Removes `lang="ts"` from the opening tag, or turns `lang="tsx"` into
/// `lang="jsx"`.
fn strip_lang(out: &mut String, script: &ScriptBlock) {
    let Some(attr) = script.lang_attribute() else {
        return;
    };
    match script.lang {
        ScriptLang::Tsx => {
            if let Some(value) = &attr.value {
                out.replace_range(value.span.range(), "jsx");
            }
        }
        ScriptLang::TypeScript => {
            let start = out[..attr.span.lo()].trim_end().len();
            out.replace_range(start..attr.span.hi(), "");
        }
        ScriptLang::JavaScript | ScriptLang::Jsx => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(code: &str) -> Option<String> {
        transform_component(code, "Comp.vue", &TransformOptions::default()).unwrap()
    }

    #[test]
    fn test_untyped_component_is_left_alone() {
        let code = "<script setup>\nconst a = 1\n</script>\n<template><p>{{ a }}</p></template>\n";
        assert_eq!(run(code), None);
    }

    #[test]
    fn test_regions_are_erased_and_lang_removed() {
        let code = concat!(
            "<script lang=\"ts\">\nexport default { name: 'Comp' as string };\n</script>\n",
            "<script setup lang=\"ts\">\nconst n: number = 1;\n</script>\n",
            "<template><p>{{ n }}</p></template>\n",
        );
        assert_eq!(
            run(code).unwrap(),
            concat!(
                "<script>\nexport default { name: 'Comp' };\n</script>\n",
                "<script setup>\nconst n = 1;\n</script>\n",
                "<template><p>{{ n }}</p></template>\n",
            )
        );
    }

    #[test]
    fn test_template_only_import_survives() {
        let code = concat!(
            "<script setup lang=\"ts\">\n",
            "import MyButton from './MyButton.vue';\n",
            "import { format, type Unit } from './format';\n",
            "const unit: Unit = 'px';\n",
            "</script>\n",
            "<template><MyButton>{{ format(1) }}</MyButton></template>\n",
        );
        assert_eq!(
            run(code).unwrap(),
            concat!(
                "<script setup>\n",
                "import MyButton from './MyButton.vue';\n",
                "import { format } from './format';\n",
                "const unit = 'px';\n",
                "</script>\n",
                "<template><MyButton>{{ format(1) }}</MyButton></template>\n",
            )
        );
    }

    #[test]
    fn test_macro_literals_are_spliced() {
        let code = concat!(
            "<script setup lang=\"ts\">\n",
            "const props = defineProps<{ label: string }>();\n",
            "const emit = defineEmits<(e: 'save') => void>();\n",
            "</script>\n",
        );
        assert_eq!(
            run(code).unwrap(),
            concat!(
                "<script setup>\n",
                "const props = defineProps({\n  label: { type: String, required: true },\n});\n",
                "const emit = defineEmits([\"save\"]);\n",
                "</script>\n",
            )
        );
    }

    #[test]
    fn test_tsx_region_becomes_jsx() {
        let code = "<script lang='tsx'>\nexport const el = <div>{1 as number}</div>;\n</script>\n";
        assert_eq!(
            run(code).unwrap(),
            "<script lang='jsx'>\nexport const el = <div>{1}</div>;\n</script>\n"
        );
    }

    #[test]
    fn test_unclosed_block_is_an_error() {
        let err = transform_component("<script lang=\"ts\">\nconst a = 1;\n", "Comp.vue", &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, TransformError::Sfc { .. }));
    }
}
