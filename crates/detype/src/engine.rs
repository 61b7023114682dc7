//! The erasure pipeline for one script text.

use crate::comments;
use crate::edits::EditSet;
use crate::erase::erase_types;
use crate::error::TransformError;
use crate::magic_comments;
use crate::newline_runs;
use crate::options::TransformOptions;
use crate::parse::parse_module;
use crate::rules::RuleContext;

/// Removes type syntax from `code` without formatting the result.
///
/// `file_name` selects the grammar: `.js`, `.jsx`, `.mjs` and `.cjs` are
/// parsed as JavaScript and only lose `@ts-` directives (when asked), `.tsx`
/// enables JSX, anything else is TypeScript.
pub fn remove_types(
    code: &str,
    file_name: &str,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let text = code.replace("\r\n", "\n");
    let text = newline_runs::encode(&text);
    let text = magic_comments::process_magic_comments(&text);

    let parsed = parse_module(text, file_name)?;
    let mut edits = EditSet::new();

    if options.remove_ts_comments {
        for comment in parsed.comments() {
            if comments::is_ts_directive(comment) {
                edits.remove_lines(parsed.text(), comment.range.clone());
            }
        }
    }

    if parsed.is_typescript() {
        erase_types(&parsed, file_name, &mut edits)?;
    }

    for rule in &options.rules {
        let before = edits.len();
        let mut cx = RuleContext::new(&parsed, file_name, &mut edits);
        rule.apply(&mut cx)?;
        log::debug!("{}: rule `{}` added {} edits", file_name, rule.name(), edits.len() - before);
    }

    log::debug!("{}: applying {} edits", file_name, edits.len());
    let erased = edits.apply(parsed.text());
    let collapsed = newline_runs::collapse(&erased);
    Ok(newline_runs::decode(&collapsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(code: &str) -> String {
        remove_types(code, "test.ts", &TransformOptions::default()).unwrap()
    }

    #[test]
    fn test_blank_lines_survive_erasure() {
        let code = "const a = 1;\n\n\ntype T = string;\nconst b = 2;\n";
        assert_eq!(run(code), "const a = 1;\n\n\nconst b = 2;\n");
    }

    #[test]
    fn test_crlf_is_normalized() {
        assert_eq!(run("let a: number = 1;\r\nlet b = 2;\r\n"), "let a = 1;\nlet b = 2;\n");
    }

    #[test]
    fn test_comment_separated_by_blank_line_is_kept() {
        let code = "// header\n\ninterface A {}\nexport const a = 1;\n";
        assert_eq!(run(code), "// header\n\nexport const a = 1;\n");
    }

    #[test]
    fn test_magic_block_is_substituted() {
        let code = "// @detype: replace\nconst x: number = 1;\n// @detype: with\n// const x = 1;\n// @detype: end\n";
        assert_eq!(run(code), " const x = 1;\n");
    }

    #[test]
    fn test_ts_directives_removed_on_request() {
        let code = "// @ts-ignore\nconst a: number = b;\n";
        let options = TransformOptions::default().remove_ts_comments(true);
        assert_eq!(remove_types(code, "test.ts", &options).unwrap(), "\nconst a = b;\n");
        assert_eq!(run(code), "// @ts-ignore\nconst a = b;\n");
    }

    #[test]
    fn test_javascript_is_not_erased() {
        let code = "import { a } from './a';\n\nexport const b = 1;\n";
        let out = remove_types(code, "test.js", &TransformOptions::default()).unwrap();
        assert_eq!(out, code);
    }

    #[test]
    fn test_template_literal_newlines_are_kept() {
        let code = "const s: string = `a\n\n\nb`;\n";
        assert_eq!(run(code), "const s = `a\n\n\nb`;\n");
    }

    #[test]
    fn test_parse_error_reports_original_line() {
        let code = "const a = 1;\n\n\n\nconst = ;\n";
        let err = remove_types(code, "test.ts", &TransformOptions::default()).unwrap_err();
        match err {
            TransformError::Parse { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }
}
