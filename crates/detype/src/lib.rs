//! Removes TypeScript type syntax while keeping the source as written.
//!
//! Type annotations, type-only declarations and imports are cut out of the
//! original text by span, so everything that stays keeps its formatting,
//! comments and blank lines. Vue single-file components are handled per
//! script region.
//!
//! # Example
//!
//! ```
//! use detype::{transform, TransformOptions};
//!
//! let code = "// Sum two numbers\nexport function add(a: number, b: number): number {\n  return a + b;\n}\n";
//! let js = transform(code, "add.ts", &TransformOptions::default()).unwrap();
//! assert_eq!(js, "// Sum two numbers\nexport function add(a, b) {\n  return a + b;\n}\n");
//! ```

mod comments;
mod edits;
mod engine;
mod erase;
mod error;
mod format;
pub mod magic_comments;
pub mod newline_runs;
mod options;
mod parse;
mod rules;
mod sfc;

pub use engine::remove_types;
pub use error::TransformError;
pub use format::{BasicFormatter, FormatError, FormatOptions, Formatter};
pub use magic_comments::{process_magic_comments, strip_magic_comments};
pub use options::TransformOptions;
pub use parse::is_typescript_file;
pub use rules::{ErasureRule, RuleContext, WithDefaultsRule};
pub use sfc::resolve::{FsLoader, TypeSourceLoader};
pub use sfc::{is_component_file, transform_component};

use std::fs;
use std::path::Path;

/// Transforms TypeScript (or a Vue component with typed scripts) into
/// JavaScript and formats the result.
///
/// A component without typed scripts is returned exactly as given, without
/// formatting.
pub fn transform(
    code: &str,
    file_name: &str,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let erased = if is_component_file(file_name) {
        match transform_component(code, file_name, options)? {
            Some(erased) => erased,
            None => return Ok(code.to_string()),
        }
    } else {
        remove_types(code, file_name, options)?
    };
    Ok(options.formatter.format(&erased, file_name, &options.format)?)
}

/// Keeps the typed side of every magic-comment block, drops the untyped
/// replacement and the sentinels, then formats the result.
pub fn remove_magic_comments(
    code: &str,
    file_name: &str,
    options: &TransformOptions,
) -> Result<String, TransformError> {
    let stripped = strip_magic_comments(code);
    Ok(options
        .formatter
        .format(&stripped, file_name, &options.format)?)
}

/// Reads `input`, transforms it and writes the result to `output`.
pub fn transform_file(
    input: &Path,
    output: &Path,
    options: &TransformOptions,
) -> Result<(), TransformError> {
    let code = read(input)?;
    let out = transform(&code, &input.to_string_lossy(), options)?;
    write(output, &out)
}

/// Reads `input`, removes its magic comments and writes the result to
/// `output`.
pub fn remove_magic_comments_from_file(
    input: &Path,
    output: &Path,
    options: &TransformOptions,
) -> Result<(), TransformError> {
    let code = read(input)?;
    let out = remove_magic_comments(&code, &input.to_string_lossy(), options)?;
    write(output, &out)
}

fn read(path: &Path) -> Result<String, TransformError> {
    fs::read_to_string(path).map_err(|source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, contents: &str) -> Result<(), TransformError> {
    let io_err = |source| TransformError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}
